// src/site/auth.rs

use crate::{
    client::RobustClient,
    constants::{self, site},
    error::*,
    scanner::quoted::extract_quoted,
    scratch::ScratchDir,
};
use log::{debug, info, warn};
use serde::Serialize;

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    authenticity_token: &'a str,
}

/// Pulls the CSRF token out of the sign-in page.
///
/// The token is the `value=` attribute following the first mention of
/// `authenticity_token`.
pub fn extract_authenticity_token(content: &str) -> AppResult<String> {
    let marker_pos = content.find(site::AUTH_TOKEN_MARKER).ok_or_else(|| {
        AppError::AuthTokenMissing(format!("no '{}' in response", site::AUTH_TOKEN_MARKER))
    })?;
    let value_pos = content[marker_pos..]
        .find(site::AUTH_VALUE_MARKER)
        .map(|i| marker_pos + i + site::AUTH_VALUE_MARKER.len())
        .ok_or_else(|| {
            AppError::AuthTokenMissing(format!(
                "no value for '{}' in response",
                site::AUTH_TOKEN_MARKER
            ))
        })?;

    let (token, _) = extract_quoted(content, value_pos)
        .map_err(|e| AppError::AuthTokenMissing(e.to_string()))?;
    debug!("got authenticity token [len {}]", token.len());
    if token.len() < constants::MIN_AUTH_TOKEN_LEN {
        return Err(AppError::AuthTokenMissing(format!(
            "token is only {} characters long",
            token.len()
        )));
    }
    Ok(token)
}

/// Signs in; the session cookies stay in the client's jar.
pub async fn login(
    client: &RobustClient,
    base_url: &str,
    email: &str,
    password: &str,
    scratch: &ScratchDir,
) -> AppResult<()> {
    let sign_in_url = format!("{}{}", base_url, site::SIGN_IN_PATH);

    let (status, content) = client.get_page(&sign_in_url).await?;
    scratch.save_debug("token.response.content", &content)?;
    if !status.is_success() {
        return Err(AppError::PageFetch {
            url: sign_in_url,
            status: status.as_u16(),
        });
    }
    let token = extract_authenticity_token(&content)?;

    let body = SignInRequest {
        email,
        password,
        authenticity_token: &token,
    };
    let res = client.post_json(&sign_in_url, &body).await?;
    let status = res.status();
    let content = res.text().await?;
    scratch.save_debug("login.response.content", &content)?;

    if status.is_success() || status.is_redirection() {
        info!("signed in as {}", email);
    } else {
        // the course pages will tell whether the session is usable
        warn!("sign-in answered HTTP {}", status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_token(token: &str) -> String {
        format!(
            r#"<form><input type="hidden" name="authenticity_token" value="{}" /></form>"#,
            token
        )
    }

    #[test]
    fn test_extract_token() {
        let token = "a".repeat(88);
        assert_eq!(extract_authenticity_token(&page_with_token(&token)).unwrap(), token);
    }

    #[test]
    fn test_short_token_rejected() {
        let err = extract_authenticity_token(&page_with_token("abc")).unwrap_err();
        assert!(matches!(err, AppError::AuthTokenMissing(_)));
    }

    #[test]
    fn test_missing_marker_or_value() {
        assert!(matches!(
            extract_authenticity_token("<html></html>"),
            Err(AppError::AuthTokenMissing(_))
        ));
        assert!(matches!(
            extract_authenticity_token(r#"<meta name="authenticity_token">"#),
            Err(AppError::AuthTokenMissing(_))
        ));
    }
}
