//! Page rendering. Templates are compiled into the binary.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tera::{Context, Tera};

use crate::error::AppError;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("add_workout.html", include_str!("../templates/add_workout.html")),
    ("training_template.html", include_str!("../templates/training_template.html")),
    ("message.html", include_str!("../templates/message.html")),
];

pub fn load() -> anyhow::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    Ok(tera)
}

pub fn render(tera: &Tera, name: &str, ctx: &Context) -> Result<Html<String>, AppError> {
    tera.render(name, ctx)
        .map(Html)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("render {name}: {e:?}")))
}

pub fn render_with_status(
    tera: &Tera,
    status: StatusCode,
    name: &str,
    ctx: &Context,
) -> Response {
    match render(tera, name, ctx) {
        Ok(html) => (status, html).into_response(),
        Err(e) => e.into_response(),
    }
}

/// A page holding one line of text, used for results and inline failures.
pub fn message(tera: &Tera, status: StatusCode, title: &str, text: &str) -> Response {
    let mut ctx = Context::new();
    ctx.insert("title", title);
    ctx.insert("message", text);
    render_with_status(tera, status, "message.html", &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_parse() {
        let tera = load().unwrap();
        for (name, _) in TEMPLATES {
            assert!(tera.get_template_names().any(|n| n == *name), "{name} missing");
        }
    }

    #[test]
    fn message_page_escapes_text() {
        let tera = load().unwrap();
        let mut ctx = Context::new();
        ctx.insert("title", "t");
        ctx.insert("message", "<script>alert(1)</script>");
        let Html(body) = render(&tera, "message.html", &ctx).unwrap();
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>alert"));
    }
}
