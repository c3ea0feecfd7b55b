//! Profile command handlers.

use std::path::Path;

use surveydesk_api::SessionCookie;
use surveydesk_core::{AvatarUpload, Dashboard, Profile, ProfileUpdateRequest};

use crate::cli::{ProfileArgs, ProfileCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::{CommandContext, util};

fn detail(p: &Profile) -> String {
    let mut lines = vec![
        format!("ID:     {}", p.id),
        format!("Name:   {}", p.full_name),
        format!("Email:  {}", p.email),
        format!("Phone:  {}", output::or_dash(p.phone.as_deref())),
    ];
    if let Some(ref role) = p.role {
        lines.push(format!("Role:   {role}"));
    }
    if let Some(ref avatar) = p.avatar_url {
        lines.push(format!("Avatar: {avatar}"));
    }
    lines.join("\n")
}

/// Guess an image MIME type from the file extension.
fn image_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn read_avatar(path: &Path) -> Result<AvatarUpload, CliError> {
    let content_type = image_content_type(path).ok_or_else(|| CliError::Validation {
        field: "avatar".into(),
        reason: format!("{} is not a png, jpeg, gif or webp image", path.display()),
    })?;
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("avatar")
        .to_owned();
    Ok(AvatarUpload {
        file_name,
        content_type: Some(content_type.to_owned()),
        bytes,
    })
}

pub async fn handle(
    dashboard: &Dashboard,
    args: ProfileArgs,
    ctx: &CommandContext<'_>,
) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Show => {
            let profile = dashboard.pages().profile().await.rendered().ok_or_else(|| {
                CliError::AuthFailed {
                    profile: ctx.run.profile_name.clone(),
                }
            })?;
            let out = output::render_single(ctx.format(), &profile, detail, |p| p.id.to_string());
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        ProfileCommand::Update {
            name,
            email,
            phone,
            avatar,
            emit_cookie,
        } => {
            let request = ProfileUpdateRequest {
                full_name: name,
                email,
                phone,
                avatar: avatar.as_deref().map(read_avatar).transpose()?,
            };
            if request.is_empty() {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: "nothing to update; pass --name, --email, --phone or --avatar".into(),
                });
            }

            let update = dashboard
                .profile()
                .update(request)
                .await
                .ok_or_else(|| CliError::RequestFailed {
                    operation: "update profile".into(),
                })?;

            if dashboard.apply_profile_update(&update) {
                if let Some(ref token) = update.new_token {
                    if ctx.run.persist_tokens {
                        match config::store_access_token(&ctx.run.profile_name, token) {
                            Ok(()) => output::print_status(
                                "Session token rotated and saved to the keyring",
                                ctx.quiet(),
                            ),
                            Err(e) => {
                                tracing::warn!(error = %e, "could not persist rotated token");
                                output::print_status(
                                    "Session token rotated; run `surveydesk config set-token` to keep it",
                                    ctx.quiet(),
                                );
                            }
                        }
                    }
                    if emit_cookie {
                        let cookie = SessionCookie::new(token.clone(), ctx.run.production);
                        println!("Set-Cookie: {}", cookie.to_set_cookie());
                    }
                }
            }

            let profile = util::expect_success(Some(update.response), "update profile")?;
            output::print_status("Profile updated", ctx.quiet());
            let out = output::render_single(ctx.format(), &profile, detail, |p| p.id.to_string());
            output::print_output(&out, ctx.quiet());
            Ok(())
        }
    }
}
