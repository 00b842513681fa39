pub mod admin_middleware;
