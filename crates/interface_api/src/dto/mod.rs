//! Request and response bodies

pub mod address;
pub mod customer;
pub mod paging;

pub use address::AddressResponse;
pub use customer::{
    AddressRequest, CustomerRequest, CustomerResponse, PatchAddressRequest,
    PatchCustomerRequest,
};
pub use paging::{PageQuery, PageResponse, SearchQuery};
