//! Built-in data: the skill catalog every new assessment starts from, the demo
//! user directory used by the mock login, and the manager's team roster.

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;

use crate::entities::{
    skill::{CategoryIcon, Skill, SkillCategory, SkillLevel},
    user::{Role, TeamMember, User},
};

/// Shared password accepted for every demo account.
pub const DEMO_PASSWORD: &str = "password123";

struct CategorySeed {
    id: &'static str,
    name: &'static str,
    icon: CategoryIcon,
    color: &'static str,
    skills: &'static [(&'static str, &'static str, &'static str)],
}

const CATALOG: &[CategorySeed] = &[
    CategorySeed {
        id: "cloud-platforms",
        name: "Cloud Platforms",
        icon: CategoryIcon::Cloud,
        color: "bg-blue-500",
        skills: &[
            ("aws", "Amazon Web Services", "EC2, S3, IAM, VPC and managed services"),
            ("azure", "Microsoft Azure", "Compute, storage and identity on Azure"),
            ("gcp", "Google Cloud Platform", "GCE, GKE, Cloud Storage and IAM"),
            ("openstack", "OpenStack", "Private cloud operation and tenancy"),
        ],
    },
    CategorySeed {
        id: "containers",
        name: "Containers & Orchestration",
        icon: CategoryIcon::Container,
        color: "bg-cyan-500",
        skills: &[
            ("docker", "Docker", "Image builds, registries and runtime tuning"),
            ("kubernetes", "Kubernetes", "Workloads, networking and cluster operations"),
            ("helm", "Helm", "Chart authoring and release management"),
            ("openshift", "OpenShift", "Operators, routes and build configs"),
        ],
    },
    CategorySeed {
        id: "iac",
        name: "Infrastructure as Code",
        icon: CategoryIcon::Code,
        color: "bg-purple-500",
        skills: &[
            ("terraform", "Terraform", "Modules, state management and providers"),
            ("ansible", "Ansible", "Playbooks, roles and inventories"),
            ("cloudformation", "CloudFormation", "Stacks, change sets and nested templates"),
            ("pulumi", "Pulumi", "Infrastructure in general-purpose languages"),
        ],
    },
    CategorySeed {
        id: "cicd",
        name: "CI/CD & DevOps",
        icon: CategoryIcon::GitBranch,
        color: "bg-green-500",
        skills: &[
            ("jenkins", "Jenkins", "Pipelines, shared libraries and agents"),
            ("github-actions", "GitHub Actions", "Workflows, runners and reusable actions"),
            ("gitlab-ci", "GitLab CI", "Pipelines, environments and runners"),
            ("argocd", "Argo CD", "GitOps delivery to Kubernetes"),
        ],
    },
    CategorySeed {
        id: "monitoring",
        name: "Monitoring & Observability",
        icon: CategoryIcon::Activity,
        color: "bg-orange-500",
        skills: &[
            ("prometheus", "Prometheus", "Metrics collection, PromQL and alerting rules"),
            ("grafana", "Grafana", "Dashboards and alert routing"),
            ("elk", "ELK Stack", "Log shipping, indexing and search"),
            ("datadog", "Datadog", "APM, infrastructure and log monitoring"),
        ],
    },
    CategorySeed {
        id: "security",
        name: "Security & Compliance",
        icon: CategoryIcon::Shield,
        color: "bg-red-500",
        skills: &[
            ("vault", "HashiCorp Vault", "Secrets management and dynamic credentials"),
            ("iam-policies", "IAM Policies", "Least-privilege access design"),
            ("container-scanning", "Container Scanning", "Image vulnerability scanning in pipelines"),
            ("compliance", "Compliance Frameworks", "SOC 2, ISO 27001 and audit evidence"),
        ],
    },
    CategorySeed {
        id: "scripting",
        name: "Scripting & Programming",
        icon: CategoryIcon::Terminal,
        color: "bg-gray-700",
        skills: &[
            ("bash", "Bash", "Shell scripting and automation"),
            ("python", "Python", "Tooling, automation and APIs"),
            ("go", "Go", "CLI tools and services"),
            ("powershell", "PowerShell", "Windows automation"),
        ],
    },
    CategorySeed {
        id: "networking",
        name: "Networking",
        icon: CategoryIcon::Network,
        color: "bg-indigo-500",
        skills: &[
            ("dns", "DNS", "Zones, records and resolution troubleshooting"),
            ("load-balancing", "Load Balancing", "L4/L7 balancing and health checks"),
            ("vpn", "VPN & Private Connectivity", "Site-to-site tunnels and peering"),
            ("service-mesh", "Service Mesh", "Istio or Linkerd traffic management"),
        ],
    },
    CategorySeed {
        id: "databases",
        name: "Databases",
        icon: CategoryIcon::Database,
        color: "bg-yellow-500",
        skills: &[
            ("postgresql", "PostgreSQL", "Administration, replication and tuning"),
            ("mysql", "MySQL", "Administration and backups"),
            ("redis", "Redis", "Caching, persistence and clustering"),
            ("mongodb", "MongoDB", "Replica sets and sharding"),
        ],
    },
    CategorySeed {
        id: "project-management",
        name: "Project Management",
        icon: CategoryIcon::ClipboardList,
        color: "bg-pink-500",
        skills: &[
            ("agile", "Agile / Scrum", "Sprint planning and ceremonies"),
            ("incident-management", "Incident Management", "On-call, postmortems and runbooks"),
            ("documentation", "Technical Documentation", "Architecture and operational docs"),
        ],
    },
];

/// Fresh copy of the catalog with every skill at "Not Familiar".
pub fn initial_skill_categories() -> Vec<SkillCategory> {
    let now = Utc::now();
    CATALOG
        .iter()
        .map(|seed| SkillCategory {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            icon: seed.icon,
            color: seed.color.to_string(),
            skills: seed
                .skills
                .iter()
                .map(|(id, name, description)| Skill {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    category: seed.id.to_string(),
                    level: SkillLevel::NotFamiliar,
                    description: Some((*description).to_string()),
                    last_updated: now,
                    is_custom: false,
                })
                .collect(),
        })
        .collect()
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

static DIRECTORY: Lazy<Vec<User>> = Lazy::new(|| {
    vec![
        User {
            id: "1".into(),
            email: "john.doe@company.com".into(),
            name: "John Doe".into(),
            role: Role::Employee,
            department: Some("Infrastructure".into()),
            position: Some("Senior DevOps Engineer".into()),
            manager_id: Some("3".into()),
            created_at: date(2023, 1, 15),
            last_login: None,
        },
        User {
            id: "2".into(),
            email: "jane.smith@company.com".into(),
            name: "Jane Smith".into(),
            role: Role::Employee,
            department: Some("Cloud Operations".into()),
            position: Some("Cloud Architect".into()),
            manager_id: Some("3".into()),
            created_at: date(2023, 2, 20),
            last_login: None,
        },
        User {
            id: "3".into(),
            email: "manager@company.com".into(),
            name: "Sarah Johnson".into(),
            role: Role::Manager,
            department: Some("Infrastructure".into()),
            position: Some("Infrastructure Manager".into()),
            manager_id: None,
            created_at: date(2022, 6, 10),
            last_login: None,
        },
    ]
});

pub fn directory() -> &'static [User] {
    &DIRECTORY
}

pub fn find_user_by_email(email: &str) -> Option<&'static User> {
    DIRECTORY.iter().find(|user| user.email.eq_ignore_ascii_case(email.trim()))
}

pub fn employee_count() -> usize {
    DIRECTORY.iter().filter(|user| user.role == Role::Employee).count()
}

const ROSTER: &[(&str, &str, &str, &str, &str)] = &[
    ("1", "John Doe", "john.doe@company.com", "Senior DevOps Engineer", "Infrastructure"),
    ("2", "Jane Smith", "jane.smith@company.com", "Cloud Architect", "Cloud Operations"),
    ("4", "Mike Johnson", "mike.johnson@company.com", "Site Reliability Engineer", "Infrastructure"),
    ("5", "Sarah Wilson", "sarah.wilson@company.com", "DevOps Engineer", "Development"),
    ("6", "David Brown", "david.brown@company.com", "Infrastructure Engineer", "Infrastructure"),
];

/// The manager's team as listed on the dashboard.
pub fn team_roster() -> Vec<TeamMember> {
    ROSTER
        .iter()
        .map(|(id, name, email, position, department)| TeamMember {
            id: (*id).to_string(),
            name: (*name).to_string(),
            email: (*email).to_string(),
            position: (*position).to_string(),
            department: (*department).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_skill_ids_are_unique() {
        let categories = initial_skill_categories();
        let ids: Vec<&str> = categories
            .iter()
            .flat_map(|c| c.skills.iter().map(|s| s.id.as_str()))
            .collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn catalog_skills_point_at_their_category() {
        for category in initial_skill_categories() {
            assert!(category.skills.iter().all(|s| s.category == category.id && !s.is_custom));
        }
    }

    #[test]
    fn directory_lookup_ignores_case() {
        let user = find_user_by_email("Manager@Company.com").unwrap();
        assert!(user.is_manager());
        assert_eq!(employee_count(), 2);
        assert!(find_user_by_email("nobody@company.com").is_none());
    }
}
