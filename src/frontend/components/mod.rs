pub mod comment_editor;
pub mod comment_form;
pub mod confirm_dialog;
pub mod error_banner;
pub mod loading;
pub mod page;
pub mod success_banner;
