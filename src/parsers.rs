//! The address grammars and the host name check they can delegate to.

mod rfc1123;
pub mod rfc2822;
pub mod rfc822;

pub use self::{
    rfc1123::{is_valid_hostname, DomainValidator, Hostname, MAX_HOSTNAME_LEN, MAX_LABEL_LEN},
    rfc2822::Rfc2822,
    rfc822::Rfc822,
};
