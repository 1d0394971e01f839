pub mod bitarray;
pub mod bitset;
pub mod u8_keys;
