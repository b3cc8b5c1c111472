pub mod event_list_view;
pub mod status_view;

#[cfg(test)]
#[path = "./view_spec.rs"]
mod view_spec;
