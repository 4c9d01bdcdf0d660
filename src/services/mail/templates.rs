//! Mail templates
//!
//! Builders return a complete [`EmailRequest`]; the sender address is filled in by
//! [`MailService`](super::MailService) at send time.

use super::mail_service::EmailRequest;

pub const TWO_FACTOR_SUBJECT: &str = "Email Verification";
pub const STUDENT_WELCOME_SUBJECT: &str = "Welcome to NextOne!";

/// Two-factor code message
pub fn two_factor_code_email(to: &str, name: &str, code: &str, ttl_minutes: i64) -> EmailRequest {
    let html = layout(
        "Your NextOne verification code",
        &format!(
            "<p>Hi {name},</p>\
             <p>Use the code below to finish signing in. It expires in {ttl_minutes} minutes.</p>\
             <p style=\"font-size:32px;font-weight:bold;letter-spacing:8px;text-align:center\">{code}</p>\
             <p>If you did not request this code you can ignore this email.</p>",
            name = escape_html(name),
            code = escape_html(code),
        ),
    );

    EmailRequest {
        to: to.to_string(),
        from: String::new(),
        subject: TWO_FACTOR_SUBJECT.to_string(),
        html,
    }
}

/// Welcome message for newly registered students
pub fn student_welcome_email(to: &str, name: &str) -> EmailRequest {
    let html = layout(
        "Welcome to NextOne",
        &format!(
            "<p>Hi {name},</p>\
             <p>Your student account is ready. Explore roadmaps, courses and job profiles to plan \
             your learning path.</p>",
            name = escape_html(name),
        ),
    );

    EmailRequest {
        to: to.to_string(),
        from: String::new(),
        subject: STUDENT_WELCOME_SUBJECT.to_string(),
        html,
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>{title}</title></head>\
         <body style=\"font-family:sans-serif;background:#f4f8fb\">\
         <div style=\"max-width:480px;margin:40px auto;background:#fff;padding:32px 24px\">\
         <h1 style=\"color:#1976d2;font-size:22px\">{title}</h1>{body}\
         <p style=\"color:#90a4ae;font-size:13px\">NextOne</p></div></body></html>"
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
