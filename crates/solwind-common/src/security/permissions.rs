//! Role permission table
//!
//! Four fixed roles, ten permission flags. The table is built once and never
//! mutated; every check is a pure lookup.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// 管理员
    #[serde(alias = "管理员")]
    Admin,
    /// 项目经理
    #[serde(alias = "项目经理")]
    ProjectManager,
    /// 财务/管理层
    #[serde(alias = "财务/管理层")]
    Finance,
    /// 普通员工
    #[default]
    #[serde(alias = "普通员工")]
    Staff,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::ProjectManager, Role::Finance, Role::Staff];

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "管理员",
            Role::ProjectManager => "项目经理",
            Role::Finance => "财务/管理层",
            Role::Staff => "普通员工",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" | "管理员" => Ok(Role::Admin),
            "project_manager" | "项目经理" => Ok(Role::ProjectManager),
            "finance" | "财务/管理层" => Ok(Role::Finance),
            "staff" | "普通员工" => Ok(Role::Staff),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Permission flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageUsers,
    ManageCostModels,
    CreateProjects,
    EditAllProjects,
    DeleteProjects,
    ViewAllProjects,
    PerformCostEstimation,
    PerformProfitAnalysis,
    ExportReports,
    ViewFinancialData,
}

impl Permission {
    pub const ALL: [Permission; 10] = [
        Permission::ManageUsers,
        Permission::ManageCostModels,
        Permission::CreateProjects,
        Permission::EditAllProjects,
        Permission::DeleteProjects,
        Permission::ViewAllProjects,
        Permission::PerformCostEstimation,
        Permission::PerformProfitAnalysis,
        Permission::ExportReports,
        Permission::ViewFinancialData,
    ];

    /// Name shown in the admin screens
    pub fn display_name(&self) -> &'static str {
        match self {
            Permission::ManageUsers => "用户管理",
            Permission::ManageCostModels => "造价模型管理",
            Permission::CreateProjects => "创建项目",
            Permission::EditAllProjects => "编辑所有项目",
            Permission::DeleteProjects => "删除项目",
            Permission::ViewAllProjects => "查看所有项目",
            Permission::PerformCostEstimation => "成本估算",
            Permission::PerformProfitAnalysis => "收益分析",
            Permission::ExportReports => "导出报表",
            Permission::ViewFinancialData => "查看财务数据",
        }
    }
}

lazy_static! {
    static ref ROLE_PERMISSIONS: HashMap<Role, HashSet<Permission>> = {
        use Permission::*;

        let mut table = HashMap::new();
        table.insert(Role::Admin, Permission::ALL.iter().copied().collect());
        // Project managers edit only the projects they manage; see can_edit_project
        table.insert(
            Role::ProjectManager,
            [
                CreateProjects,
                ViewAllProjects,
                PerformCostEstimation,
                PerformProfitAnalysis,
                ExportReports,
                ViewFinancialData,
            ]
            .into_iter()
            .collect(),
        );
        table.insert(
            Role::Finance,
            [
                ViewAllProjects,
                PerformProfitAnalysis,
                ExportReports,
                ViewFinancialData,
            ]
            .into_iter()
            .collect(),
        );
        table.insert(Role::Staff, [ViewAllProjects].into_iter().collect());
        table
    };
}

/// Whether `role` holds `permission`
pub fn has_permission(role: Role, permission: Permission) -> bool {
    ROLE_PERMISSIONS
        .get(&role)
        .map_or(false, |granted| granted.contains(&permission))
}

/// Lookup by stored role name. Unknown roles hold no permissions.
pub fn has_permission_named(role: &str, permission: Permission) -> bool {
    role.parse::<Role>()
        .map_or(false, |role| has_permission(role, permission))
}

/// Every permission flag for `role`, in display order
pub fn role_permissions(role: Role) -> Vec<(Permission, bool)> {
    Permission::ALL
        .iter()
        .map(|p| (*p, has_permission(role, *p)))
        .collect()
}

/// Roles that can be assigned to a user
pub fn available_roles() -> &'static [Role] {
    &Role::ALL
}

/// Whether a user may edit a project.
///
/// Admins may edit everything; project managers only projects they manage.
pub fn can_edit_project(role: Role, user_id: i64, project_manager_id: Option<i64>) -> bool {
    if has_permission(role, Permission::EditAllProjects) {
        return true;
    }
    role == Role::ProjectManager && project_manager_id == Some(user_id)
}
