//! Syntax queries shared by the transforms.

pub mod transform_utils;
