pub mod direct_tests;
pub mod scenario_tests;
