//! Stub Library Adapter

mod directory_stub_library;

pub use directory_stub_library::DirectoryStubLibrary;
