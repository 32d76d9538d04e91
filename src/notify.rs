use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Variant
///
/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Variant {
    Default,
    Destructive,
}

/// Notification
///
/// A transient, user-facing message (the admin UI renders these as toasts). It is
/// also the JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }

    // --- Admin view ---

    pub fn access_denied() -> Self {
        Self::destructive("Akses Ditolak", "Anda tidak memiliki akses admin")
    }

    pub fn access_check_failed() -> Self {
        Self::destructive("Error", "Gagal memverifikasi akses admin")
    }

    pub fn list_failed() -> Self {
        Self::destructive("Error", "Gagal memuat artikel")
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::destructive("Validasi Gagal", message)
    }

    pub fn backend_error(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::destructive("Error", "Terjadi kesalahan")
        } else {
            Self::destructive("Error", message)
        }
    }

    pub fn post_created() -> Self {
        Self::info("Berhasil", "Artikel berhasil dibuat")
    }

    pub fn post_updated() -> Self {
        Self::info("Berhasil", "Artikel berhasil diperbarui")
    }

    pub fn post_deleted() -> Self {
        Self::info("Berhasil", "Artikel berhasil dihapus")
    }

    pub fn delete_failed() -> Self {
        Self::destructive("Error", "Gagal menghapus artikel")
    }

    pub fn delete_not_confirmed() -> Self {
        Self::destructive("Dibatalkan", DELETE_CONFIRMATION_PROMPT)
    }

    // --- Auth view ---

    pub fn login_succeeded() -> Self {
        Self::info("Login Berhasil", "Selamat datang kembali!")
    }

    pub fn invalid_credentials() -> Self {
        Self::destructive("Login Gagal", "Email atau password salah")
    }

    pub fn registered() -> Self {
        Self::info(
            "Registrasi Berhasil",
            "Akun Anda telah dibuat. Silakan login.",
        )
    }

    pub fn already_registered() -> Self {
        Self::destructive("Registrasi Gagal", "Email sudah terdaftar")
    }
}

/// The question asked before a post is deleted.
pub const DELETE_CONFIRMATION_PROMPT: &str = "Yakin ingin menghapus artikel ini?";

/// Route
///
/// Where the front-end should navigate next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Route {
    Home,
    Login,
    Admin,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/auth",
            Route::Admin => "/admin",
        }
    }
}
