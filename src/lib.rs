//! 연금 추정과 번역 로직을 라이브러리로 분리하여 CLI 와 GUI 가 함께 쓴다.

pub mod app;
pub mod config;
pub mod i18n;
pub mod pension;
pub mod ui_cli;
