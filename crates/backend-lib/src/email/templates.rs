// ============================
// crates/backend-lib/src/email/templates.rs
// ============================

//! HTML bodies for outgoing mail. The `{{CODE}}` marker is replaced at
//! render time.

const VERIFICATION_CODE_TEMPLATE: &str = r#"<html>
  <body style="font-family: sans-serif; color: #222;">
    <h2>Your verification code</h2>
    <p>Enter this code to continue. It expires in a few minutes.</p>
    <p style="font-size: 28px; letter-spacing: 6px; font-weight: bold;">{{CODE}}</p>
    <p>If you did not request this code, you can ignore this email.</p>
  </body>
</html>"#;

const WELCOME_TEMPLATE: &str = r#"<html>
  <body style="font-family: sans-serif; color: #222;">
    <h2>Welcome!</h2>
    <p>Your email is verified and your account is ready. Happy shopping.</p>
  </body>
</html>"#;

pub fn render_verification_code(code: &str) -> String {
    VERIFICATION_CODE_TEMPLATE.replace("{{CODE}}", code)
}

pub fn render_welcome() -> String {
    WELCOME_TEMPLATE.to_string()
}
