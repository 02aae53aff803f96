// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mail templates and the optional notification collaborator.
//!
//! No route sends mail yet. A `Notifier` is only constructed when
//! `MAIL_NOTIFICATIONS` is enabled.

use crate::error::AppError;

/// Sends account-related mail.
pub trait Notifier: Send + Sync {
    /// Invite `recipient` to register via `registration_link`.
    fn send_registration_invite(
        &self,
        recipient: &str,
        message: &str,
        registration_link: &str,
    ) -> Result<(), AppError>;

    /// Send a one-time passcode to `recipient`.
    fn send_otp(&self, recipient: &str, message: &str, otp_code: &str) -> Result<(), AppError>;
}

/// Notifier that renders mail and records it in the logs instead of sending it.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_registration_invite(
        &self,
        recipient: &str,
        message: &str,
        registration_link: &str,
    ) -> Result<(), AppError> {
        let html = render_registration_invite(message, registration_link);
        tracing::info!(recipient, bytes = html.len(), "Registration invite rendered");
        Ok(())
    }

    fn send_otp(&self, recipient: &str, message: &str, otp_code: &str) -> Result<(), AppError> {
        let html = render_otp(message, otp_code);
        tracing::info!(recipient, bytes = html.len(), "OTP mail rendered");
        Ok(())
    }
}

/// HTML body of a registration invite.
pub fn render_registration_invite(message: &str, registration_link: &str) -> String {
    render_page(
        "Registration Invite",
        &format!(
            "<p>{}</p>\n    <p>Click the link below to register.</p>\n    \
             <a style=\"font-weight: 500;\" href=\"{}\">Register</a>",
            escape_html(message),
            escape_html(registration_link)
        ),
    )
}

/// HTML body of a one-time passcode mail.
pub fn render_otp(message: &str, otp_code: &str) -> String {
    render_page(
        "OTP Verification",
        &format!(
            "<p>{}</p>\n    <p style=\"font-weight: 500;\">Your OTP is: {}</p>",
            escape_html(message),
            escape_html(otp_code)
        ),
    )
}

fn render_page(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <div>\n    <h3>{title}</h3>\n    {content}\n</div>\n\
         </body>\n\
         </html>\n"
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_template() {
        let html = render_otp("Use this code to sign in.", "482913");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>OTP Verification</title>"));
        assert!(html.contains("Your OTP is: 482913"));
    }

    #[test]
    fn test_invite_escapes_input() {
        let html = render_registration_invite(
            "<script>alert(1)</script>",
            "https://example.com/register?a=1&b=\"2\"",
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("href=\"https://example.com/register?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn test_log_notifier_accepts_mail() {
        let notifier: Box<dyn Notifier> = Box::new(LogNotifier);
        assert!(notifier.send_otp("a@example.com", "Hi", "123456").is_ok());
        assert!(notifier
            .send_registration_invite("a@example.com", "Join us", "https://example.com")
            .is_ok());
    }
}
