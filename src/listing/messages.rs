use crate::error::ApiError;

/// Static banner sentences for one list screen
#[derive(Debug, Clone, Copy)]
pub struct ScreenMessages {
    pub not_authenticated: &'static str,
    pub session_expired: &'static str,
    pub forbidden: &'static str,
    pub not_found: &'static str,
    pub server: &'static str,
    pub network: &'static str,
    pub unexpected: &'static str,
    pub delete_forbidden: &'static str,
    pub delete_failed: &'static str,
}

impl ScreenMessages {
    /// Banner for a failed load. 401 never gets here: the guard handles it.
    pub fn for_load(&self, err: &ApiError) -> String {
        match err {
            ApiError::Forbidden(_) => self.forbidden.to_string(),
            ApiError::NotFound(_) => self.not_found.to_string(),
            ApiError::Server { .. } => self.server.to_string(),
            ApiError::Network(_) => self.network.to_string(),
            ApiError::UnexpectedShape(_) => self.unexpected.to_string(),
            ApiError::SessionExpired | ApiError::InvalidCredentials => self.session_expired.to_string(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Http { .. } => format!("{} ({})", self.unexpected, err),
        }
    }

    pub fn for_delete(&self, err: &ApiError) -> String {
        match err {
            ApiError::Forbidden(_) => self.delete_forbidden.to_string(),
            ApiError::Network(_) => self.network.to_string(),
            ApiError::Server { .. } => self.server.to_string(),
            ApiError::Validation { message, .. } => message.clone(),
            _ => format!("{}: {}", self.delete_failed, err),
        }
    }
}

pub const PROFILES: ScreenMessages = ScreenMessages {
    not_authenticated: "Debes iniciar sesión para ver los perfiles",
    session_expired: "Tu sesión ha expirado. Inicia sesión de nuevo para ver los perfiles",
    forbidden: "No tienes permisos para ver los perfiles",
    not_found: "No se encontró el listado de perfiles",
    server: "Error del servidor al cargar los perfiles. Inténtalo más tarde",
    network: "No se pudo conectar con el servidor. Verifica tu conexión",
    unexpected: "Respuesta inesperada al cargar los perfiles",
    delete_forbidden: "No tienes permisos para eliminar este perfil",
    delete_failed: "No se pudo eliminar el perfil",
};

pub const RELATIONSHIPS: ScreenMessages = ScreenMessages {
    not_authenticated: "Debes iniciar sesión para ver las relaciones",
    session_expired: "Tu sesión ha expirado. Inicia sesión de nuevo para ver las relaciones",
    forbidden: "No tienes permisos para ver las relaciones",
    not_found: "No se encontró el listado de relaciones",
    server: "Error del servidor al cargar las relaciones. Inténtalo más tarde",
    network: "No se pudo conectar con el servidor. Verifica tu conexión",
    unexpected: "Respuesta inesperada al cargar las relaciones",
    delete_forbidden: "No tienes permisos para eliminar esta relación",
    delete_failed: "No se pudo eliminar la relación",
};

pub const USERS: ScreenMessages = ScreenMessages {
    not_authenticated: "Debes iniciar sesión para ver los usuarios",
    session_expired: "Tu sesión ha expirado. Inicia sesión de nuevo para ver los usuarios",
    forbidden: "No tienes permisos para ver los usuarios",
    not_found: "No se encontró el listado de usuarios",
    server: "Error del servidor al cargar los usuarios. Inténtalo más tarde",
    network: "No se pudo conectar con el servidor. Verifica tu conexión",
    unexpected: "Respuesta inesperada al cargar los usuarios",
    delete_forbidden: "No tienes permisos para eliminar este usuario",
    delete_failed: "No se pudo eliminar el usuario",
};
