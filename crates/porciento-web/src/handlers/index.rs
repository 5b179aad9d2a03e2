//! `GET /`: the calculator form.

use axum::response::Html;

const FORM: &str = include_str!("../../assets/calculator.html");

pub async fn handler() -> Html<&'static str> { Html(FORM) }
