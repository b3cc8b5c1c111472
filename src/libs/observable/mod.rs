pub mod observable;
pub mod observable_list;
pub mod observable_map;
