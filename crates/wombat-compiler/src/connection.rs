//! Connection sub-document shared by every NATS-backed section.

use wombat_model::NatsConfig;

use crate::fragment::Fragment;

/// Render `urls` plus, when authentication is enabled, a nested `auth`
/// block holding whichever of `user_jwt` / `user_nkey_seed` are set.
///
/// Credentials are always nested under `auth`, never flattened next to
/// `urls`. An enabled but credential-less config renders no `auth` key.
pub fn compile_connection(cfg: &NatsConfig) -> Fragment {
    let connection = Fragment::new().list("urls", [cfg.url.as_str()]);
    if !cfg.auth_enabled {
        return connection;
    }

    let auth = Fragment::new()
        .opt_scalar("user_jwt", non_empty(cfg.jwt.as_deref()))
        .opt_scalar("user_nkey_seed", non_empty(cfg.seed.as_deref()));
    if auth.is_empty() {
        connection
    } else {
        connection.fragment("auth", auth)
    }
}

/// `metadata.include_patterns: [".*"]`, forwarding every header.
pub(crate) fn include_all_metadata() -> Fragment {
    Fragment::new().list("include_patterns", [".*"])
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
