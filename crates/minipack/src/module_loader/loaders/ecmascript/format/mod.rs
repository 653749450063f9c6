pub mod cjs;
