//! Flow nodes that each wrap one blob storage call.
//!
//! A host creates nodes through the [`registry::NodeRegistry`], feeds them
//! messages with [`node::BlobNode::on_input`] and tears them down with
//! [`node::BlobNode::close`].

pub mod container;
pub mod delete;
pub mod download;
pub mod node;
pub mod registry;
pub mod upload;

pub use node::BlobNode;
pub use registry::NodeRegistry;
