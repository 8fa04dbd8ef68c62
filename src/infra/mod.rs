//! Infrastructure layer - persistence and media storage

pub mod media;
pub mod storage;
