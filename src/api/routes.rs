//! API Route Definitions
//!
//! This module defines all HTTP routes and their corresponding handlers using a flexible
//! builder pattern. The RouterBuilder allows selective enabling/disabling of API endpoints,
//! for example to expose lookups without registration.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::*;

/// Builder for creating API routes with configurable endpoints
#[derive(Default)]
pub struct RouterBuilder {
    /// Whether to enable the health check endpoint (GET /health)
    health_check: bool,
    /// Whether to enable the registration endpoint (POST /users)
    register: bool,
    /// Whether to enable the duplicate-email check (GET /users/{email}/registered)
    check_registered: bool,
    /// Whether to enable the first name lookup (GET /users/{email}/first-name)
    first_name: bool,
    /// Whether to enable the address lookup (GET /users/{email}/address)
    address: bool,
    /// Whether to enable the login endpoint (POST /auth/login)
    login: bool,
}

impl RouterBuilder {
    /// Creates a new router builder with all routes disabled by default
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router builder with all routes enabled
    pub fn with_all_routes() -> Self {
        Self {
            health_check: true,
            register: true,
            check_registered: true,
            first_name: true,
            address: true,
            login: true,
        }
    }

    /// Creates a router with only lookup routes
    ///
    /// Includes health check, registration check and profile lookups.
    /// Excludes registration and login.
    pub fn with_readonly_routes() -> Self {
        Self {
            health_check: true,
            register: false,
            check_registered: true,
            first_name: true,
            address: true,
            login: false,
        }
    }

    /// Enables or disables the health check endpoint (GET /health)
    pub fn health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    /// Enables or disables the registration endpoint (POST /users)
    pub fn register(mut self, enabled: bool) -> Self {
        self.register = enabled;
        self
    }

    /// Enables or disables GET /users/{email}/registered
    pub fn check_registered(mut self, enabled: bool) -> Self {
        self.check_registered = enabled;
        self
    }

    /// Enables or disables GET /users/{email}/first-name
    pub fn first_name(mut self, enabled: bool) -> Self {
        self.first_name = enabled;
        self
    }

    /// Enables or disables GET /users/{email}/address
    pub fn address(mut self, enabled: bool) -> Self {
        self.address = enabled;
        self
    }

    /// Enables or disables the login endpoint (POST /auth/login)
    pub fn login(mut self, enabled: bool) -> Self {
        self.login = enabled;
        self
    }

    /// Builds the Axum router with the configured routes
    pub fn build(self) -> Router<AppState> {
        let mut router = Router::new();

        if self.health_check {
            router = router.route("/health", get(health_check));
        }

        if self.register {
            router = router.route("/users", post(register_user));
        }

        if self.check_registered {
            router = router.route("/users/{email}/registered", get(check_registered));
        }

        if self.first_name {
            router = router.route("/users/{email}/first-name", get(get_first_name));
        }

        if self.address {
            router = router.route("/users/{email}/address", get(get_address));
        }

        if self.login {
            router = router.route("/auth/login", post(login));
        }

        router
    }
}

/// Creates all API routes
pub fn create_routes() -> Router<AppState> {
    RouterBuilder::with_all_routes().build()
}

/// Creates router with lookup routes only
pub fn create_readonly_routes() -> Router<AppState> {
    RouterBuilder::with_readonly_routes().build()
}
