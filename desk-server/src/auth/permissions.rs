//! Permission Definitions
//!
//! Simplified RBAC permission system.
//!
//! ## 设计原则
//! - 模块化权限：`<module>:view` 只读，`<module>:manage` 增删改
//! - `statistics:view` 单独控制统计看板
//! - 用户管理与超级权限 `all` 仅 admin 角色可用

/// 可配置权限列表
pub const ALL_PERMISSIONS: &[&str] = &[
    "customers:view",
    "customers:manage",
    "requests:view",
    "requests:manage",
    "appointments:view",
    "appointments:manage",
    "statistics:view",
    "settings:manage",
];

/// Admin 专属权限（不在可配置列表中）
pub const ADMIN_ONLY_PERMISSIONS: &[&str] = &[
    "users:manage", // 用户管理
    "all",          // 超级权限
];

/// Role name that bypasses permission lookups (compared case-insensitively)
pub const ADMIN_ROLE: &str = "admin";

/// Default role permissions
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

/// 经理角色默认权限（全部可配置权限）
pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[
    "customers:*",
    "requests:*",
    "appointments:*",
    "statistics:view",
    "settings:manage",
];

/// 普通员工默认权限（只读业务数据，不含统计）
pub const DEFAULT_STAFF_PERMISSIONS: &[&str] = &[
    "customers:view",
    "requests:view",
    "appointments:view",
];

/// Get permissions for a role name
pub fn get_default_permissions(role_name: &str) -> Vec<String> {
    let defaults: &[&str] = match role_name.to_lowercase().as_str() {
        "admin" => DEFAULT_ADMIN_PERMISSIONS,
        "manager" => DEFAULT_MANAGER_PERMISSIONS,
        "staff" => DEFAULT_STAFF_PERMISSIONS,
        _ => &[],
    };
    defaults.iter().map(|s| s.to_string()).collect()
}

/// Whether a role name is the administrator role
pub fn is_admin_role(role_name: &str) -> bool {
    role_name.trim().eq_ignore_ascii_case(ADMIN_ROLE)
}

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
        || ADMIN_ONLY_PERMISSIONS.contains(&permission)
        || permission
            .strip_suffix(":*")
            .is_some_and(|module| !module.is_empty() && !module.contains(':'))
}
