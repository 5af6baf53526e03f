mod authoring;
mod common;
