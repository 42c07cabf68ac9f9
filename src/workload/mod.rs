//! Request builders for the log server actions.
mod payload;

pub use payload::{
    REFERENCE_LEN, generate_reference, insert_request, insert_requests, query_all_request,
};
