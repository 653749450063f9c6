pub mod ecmascript;
