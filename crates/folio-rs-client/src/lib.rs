//! HTTP implementation of the record endpoint.
//!
//! Reads are `GET <base_url><api_path>`. Saves are `POST` (create) or `PUT`
//! (update) with a JSON body, switching to `multipart/form-data` when the
//! request carries attachments. Deletes send `{"id": ...}` as a JSON body.

mod endpoint;

pub use endpoint::HttpEndpoint;
