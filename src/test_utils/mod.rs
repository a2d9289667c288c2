#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod http;

pub(crate) use fixtures::{budget, get_test_connection, get_test_state, transaction};
pub(crate) use http::{get_header, parse_json_body};
