pub mod dashboard;
pub mod material_view;
pub mod plan_view;
pub mod quiz_view;
