pub mod capacity;
pub mod ringchannel;
pub mod time;
