use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in with email and password.
    Login(AuthLoginArgs),
    /// Forget the stored session.
    Logout,
    /// Show who is logged in and where the session came from.
    Status,
    /// Register a new creator account.
    Register(RegisterArgs),
    /// Accept an executor invitation and log in.
    AcceptInvite(AcceptInviteArgs),
    /// Confirm an email address with the token from the verification mail.
    VerifyEmail { token: String },
    /// Send the verification mail again.
    ResendVerification { email: String },
    /// Change the password of the logged-in account.
    ChangePassword(ChangePasswordArgs),
    /// Mail a password reset link.
    RequestPasswordReset { email: String },
    /// Set a new password with a reset token.
    ResetPassword(ResetPasswordArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AcceptInviteArgs {
    /// Token from the invitation link.
    pub token: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub position: String,
    #[arg(long)]
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ChangePasswordArgs {
    #[arg(long)]
    pub old: String,
    #[arg(long)]
    pub new: String,
}

#[derive(Clone, Debug, Args)]
pub struct ResetPasswordArgs {
    /// Token from the reset mail.
    pub token: String,
    #[arg(long)]
    pub password: String,
    /// Repeat of `--password`.
    #[arg(long)]
    pub confirm: String,
}
