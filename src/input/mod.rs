//! Fragment input: reading and parsing locale-keyed translation documents.

pub mod locale;
pub mod source;

pub use source::{
    Fragment,
    FragmentError,
    load_fragment,
};
