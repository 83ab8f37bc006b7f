//! Type URLs for common per-route filter messages.
//!
//! Filter plugins usually return one of these from their extractor. Anything
//! else can implement [`TypedMessage`] itself or be wrapped in a
//! [`TypedConfig`](super::TypedConfig).

use super::TypedMessage;
use envoy_types::pb::envoy::config::route::v3::FilterConfig;
use envoy_types::pb::envoy::extensions::filters::http::compressor::v3::CompressorPerRoute;
use envoy_types::pb::envoy::extensions::filters::http::cors::v3::CorsPolicy;
use envoy_types::pb::envoy::extensions::filters::http::ext_authz::v3::ExtAuthzPerRoute;
use envoy_types::pb::envoy::extensions::filters::http::header_mutation::v3::HeaderMutationPerRoute;
use envoy_types::pb::envoy::extensions::filters::http::jwt_authn::v3::PerRouteConfig as JwtPerRouteConfig;
use envoy_types::pb::envoy::extensions::filters::http::local_ratelimit::v3::LocalRateLimit;
use envoy_types::pb::envoy::extensions::filters::http::rbac::v3::RbacPerRoute;
use envoy_types::pb::envoy::extensions::filters::http::ratelimit::v3::RateLimitPerRoute;
use envoy_types::pb::google::protobuf::Any;

pub const STRUCT_TYPE_URL: &str = "type.googleapis.com/google.protobuf.Struct";
pub const FILTER_CONFIG_TYPE_URL: &str = "type.googleapis.com/envoy.config.route.v3.FilterConfig";
pub const LOCAL_RATE_LIMIT_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.local_ratelimit.v3.LocalRateLimit";
pub const JWT_AUTHN_PER_ROUTE_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.jwt_authn.v3.PerRouteConfig";
pub const CORS_POLICY_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.cors.v3.CorsPolicy";
pub const HEADER_MUTATION_PER_ROUTE_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.header_mutation.v3.HeaderMutationPerRoute";
pub const RATE_LIMIT_PER_ROUTE_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.ratelimit.v3.RateLimitPerRoute";
pub const RBAC_PER_ROUTE_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.rbac.v3.RBACPerRoute";
pub const EXT_AUTHZ_PER_ROUTE_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.ext_authz.v3.ExtAuthzPerRoute";
pub const COMPRESSOR_PER_ROUTE_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.compressor.v3.CompressorPerRoute";

macro_rules! typed_message {
    ($($ty:ty => $url:expr),+ $(,)?) => {
        $(
            impl TypedMessage for $ty {
                const TYPE_URL: &'static str = $url;
            }
        )+
    };
}

typed_message! {
    prost_types::Struct => STRUCT_TYPE_URL,
    FilterConfig => FILTER_CONFIG_TYPE_URL,
    LocalRateLimit => LOCAL_RATE_LIMIT_TYPE_URL,
    JwtPerRouteConfig => JWT_AUTHN_PER_ROUTE_TYPE_URL,
    CorsPolicy => CORS_POLICY_TYPE_URL,
    HeaderMutationPerRoute => HEADER_MUTATION_PER_ROUTE_TYPE_URL,
    RateLimitPerRoute => RATE_LIMIT_PER_ROUTE_TYPE_URL,
    RbacPerRoute => RBAC_PER_ROUTE_TYPE_URL,
    ExtAuthzPerRoute => EXT_AUTHZ_PER_ROUTE_TYPE_URL,
    CompressorPerRoute => COMPRESSOR_PER_ROUTE_TYPE_URL,
}

/// `FilterConfig` that turns the named filter off for the scope it is attached to.
pub fn disabled_filter_config() -> FilterConfig {
    FilterConfig { config: None, is_optional: false, disabled: true }
}

/// `FilterConfig` wrapping `config`, marked optional so that proxies without
/// the filter ignore it instead of rejecting the route.
pub fn optional_filter_config(config: Any) -> FilterConfig {
    FilterConfig { config: Some(config), is_optional: true, disabled: false }
}
