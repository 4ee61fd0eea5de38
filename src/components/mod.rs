pub mod analysis_progress;
pub mod analysis_results;
pub mod api_key_form;
pub mod api_key_modal;
pub mod image_comparison;
pub mod image_upload;
pub mod performance_form;
pub mod sidebar;
pub mod status_badge;
