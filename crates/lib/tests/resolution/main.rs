mod common;

mod end_to_end_tests;
mod graph_tests;
mod property_tests;
mod region_tests;
mod registry_tests;
