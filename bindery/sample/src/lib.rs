//! A pet store served and called through code generated from
//! `openapi/petstore.yaml`.
//!
//! The build script compiles the document into [`petstore`]; [`PetServer`]
//! implements the generated contract.

pub mod petstore {
    include!(concat!(env!("OUT_DIR"), "/petstore.rs"));
}

pub mod pet_server;

pub use pet_server::PetServer;
