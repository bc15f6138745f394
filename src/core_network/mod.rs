pub mod data_conn;
pub mod network;
pub mod pasv;
