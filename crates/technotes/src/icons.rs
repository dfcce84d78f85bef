//! Technology icon catalog.
//!
//! Maps a technology key (the `techIcon` field of a post) to display metadata.
//! Icons are served from the Simple Icons CDN:
//! `https://cdn.simpleicons.org/{slug}/{color}`.

use serde::Serialize;

/// Base URL of the icon CDN.
const ICON_CDN: &str = "https://cdn.simpleicons.org";

/// Key used when a post's icon is absent or unknown.
pub const FALLBACK_KEY: &str = "other";

/// Key preselected in the authoring form.
pub const DEFAULT_KEY: &str = "docker";

/// Display metadata for one technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TechIcon {
    /// Simple Icons slug.
    pub slug: &'static str,
    /// Human readable label.
    pub label: &'static str,
    /// Icon color, hex without `#`.
    pub color: &'static str,
    /// Background color class for the icon badge.
    pub bg_color: &'static str,
}

impl TechIcon {
    const fn new(
        slug: &'static str,
        label: &'static str,
        color: &'static str,
        bg_color: &'static str,
    ) -> Self {
        Self {
            slug,
            label,
            color,
            bg_color,
        }
    }

    /// CDN URL of the icon image.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{ICON_CDN}/{}/{}", self.slug, self.color)
    }
}

const OTHER: TechIcon = TechIcon::new("markdown", "Other", "000000", "bg-gray-100");

const CATALOG: &[(&str, TechIcon)] = &[
    // Languages
    ("javascript", TechIcon::new("javascript", "JavaScript", "F7DF1E", "bg-yellow-50")),
    ("typescript", TechIcon::new("typescript", "TypeScript", "3178C6", "bg-blue-50")),
    ("python", TechIcon::new("python", "Python", "3776AB", "bg-blue-50")),
    ("go", TechIcon::new("go", "Go", "00ADD8", "bg-cyan-50")),
    ("rust", TechIcon::new("rust", "Rust", "000000", "bg-orange-50")),
    ("php", TechIcon::new("php", "PHP", "777BB4", "bg-purple-50")),
    ("ruby", TechIcon::new("ruby", "Ruby", "CC342D", "bg-red-50")),
    ("java", TechIcon::new("openjdk", "Java", "437291", "bg-orange-50")),
    ("csharp", TechIcon::new("csharp", "C#", "512BD4", "bg-purple-50")),
    ("swift", TechIcon::new("swift", "Swift", "F05138", "bg-orange-50")),
    ("kotlin", TechIcon::new("kotlin", "Kotlin", "7F52FF", "bg-purple-50")),
    ("dart", TechIcon::new("dart", "Dart", "0175C2", "bg-blue-50")),

    // Frontend
    ("react", TechIcon::new("react", "React", "61DAFB", "bg-cyan-50")),
    ("vue", TechIcon::new("vuedotjs", "Vue.js", "4FC08D", "bg-green-50")),
    ("angular", TechIcon::new("angular", "Angular", "DD0031", "bg-red-50")),
    ("svelte", TechIcon::new("svelte", "Svelte", "FF3E00", "bg-orange-50")),
    ("nextjs", TechIcon::new("nextdotjs", "Next.js", "000000", "bg-gray-100")),
    ("astro", TechIcon::new("astro", "Astro", "BC52EE", "bg-purple-50")),
    ("tailwindcss", TechIcon::new("tailwindcss", "Tailwind CSS", "06B6D4", "bg-cyan-50")),
    ("html", TechIcon::new("html5", "HTML", "E34F26", "bg-orange-50")),
    ("css", TechIcon::new("css3", "CSS", "1572B6", "bg-blue-50")),

    // Backend/Runtime
    ("nodejs", TechIcon::new("nodedotjs", "Node.js", "339933", "bg-green-50")),
    ("deno", TechIcon::new("deno", "Deno", "000000", "bg-gray-100")),
    ("bun", TechIcon::new("bun", "Bun", "000000", "bg-yellow-50")),
    ("express", TechIcon::new("express", "Express", "000000", "bg-gray-100")),
    ("fastapi", TechIcon::new("fastapi", "FastAPI", "009688", "bg-teal-50")),
    ("django", TechIcon::new("django", "Django", "092E20", "bg-green-50")),
    ("rails", TechIcon::new("rubyonrails", "Rails", "CC0000", "bg-red-50")),
    ("laravel", TechIcon::new("laravel", "Laravel", "FF2D20", "bg-red-50")),

    // Cloud/Infra
    ("aws", TechIcon::new("amazonwebservices", "AWS", "232F3E", "bg-orange-50")),
    ("gcp", TechIcon::new("googlecloud", "GCP", "4285F4", "bg-blue-50")),
    ("azure", TechIcon::new("microsoftazure", "Azure", "0078D4", "bg-blue-50")),
    ("vercel", TechIcon::new("vercel", "Vercel", "000000", "bg-gray-100")),
    ("cloudflare", TechIcon::new("cloudflare", "Cloudflare", "F38020", "bg-orange-50")),
    ("netlify", TechIcon::new("netlify", "Netlify", "00C7B7", "bg-teal-50")),
    ("firebase", TechIcon::new("firebase", "Firebase", "FFCA28", "bg-yellow-50")),
    ("supabase", TechIcon::new("supabase", "Supabase", "3FCF8E", "bg-green-50")),

    // DevOps/Tools
    ("docker", TechIcon::new("docker", "Docker", "2496ED", "bg-blue-50")),
    ("kubernetes", TechIcon::new("kubernetes", "Kubernetes", "326CE5", "bg-blue-50")),
    ("terraform", TechIcon::new("terraform", "Terraform", "7B42BC", "bg-purple-50")),
    ("ansible", TechIcon::new("ansible", "Ansible", "EE0000", "bg-red-50")),
    ("github", TechIcon::new("github", "GitHub", "181717", "bg-gray-100")),
    ("gitlab", TechIcon::new("gitlab", "GitLab", "FC6D26", "bg-orange-50")),
    ("git", TechIcon::new("git", "Git", "F05032", "bg-red-50")),
    ("linux", TechIcon::new("linux", "Linux", "FCC624", "bg-yellow-50")),
    ("ubuntu", TechIcon::new("ubuntu", "Ubuntu", "E95420", "bg-orange-50")),
    ("nginx", TechIcon::new("nginx", "Nginx", "009639", "bg-green-50")),

    // Database
    ("postgresql", TechIcon::new("postgresql", "PostgreSQL", "4169E1", "bg-blue-50")),
    ("mysql", TechIcon::new("mysql", "MySQL", "4479A1", "bg-blue-50")),
    ("mongodb", TechIcon::new("mongodb", "MongoDB", "47A248", "bg-green-50")),
    ("redis", TechIcon::new("redis", "Redis", "DC382D", "bg-red-50")),
    ("sqlite", TechIcon::new("sqlite", "SQLite", "003B57", "bg-blue-50")),
    ("prisma", TechIcon::new("prisma", "Prisma", "2D3748", "bg-gray-100")),

    // Mobile
    ("flutter", TechIcon::new("flutter", "Flutter", "02569B", "bg-blue-50")),
    ("reactnative", TechIcon::new("react", "React Native", "61DAFB", "bg-cyan-50")),
    ("android", TechIcon::new("android", "Android", "3DDC84", "bg-green-50")),
    ("ios", TechIcon::new("apple", "iOS", "000000", "bg-gray-100")),

    // AI/ML
    ("openai", TechIcon::new("openai", "OpenAI", "412991", "bg-purple-50")),
    ("anthropic", TechIcon::new("anthropic", "Anthropic", "191919", "bg-gray-100")),
    ("tensorflow", TechIcon::new("tensorflow", "TensorFlow", "FF6F00", "bg-orange-50")),
    ("pytorch", TechIcon::new("pytorch", "PyTorch", "EE4C2C", "bg-red-50")),

    // Other
    ("graphql", TechIcon::new("graphql", "GraphQL", "E10098", "bg-pink-50")),
    ("vim", TechIcon::new("vim", "Vim", "019733", "bg-green-50")),
    ("vscode", TechIcon::new("visualstudiocode", "VS Code", "007ACC", "bg-blue-50")),
    ("npm", TechIcon::new("npm", "npm", "CB3837", "bg-red-50")),
    ("pnpm", TechIcon::new("pnpm", "pnpm", "F69220", "bg-orange-50")),
    (FALLBACK_KEY, OTHER),
];

/// A named group of icon keys, in picker order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconGroup {
    /// Group heading.
    pub name: &'static str,
    /// Catalog keys in this group.
    pub keys: &'static [&'static str],
}

const GROUPS: &[IconGroup] = &[
    IconGroup {
        name: "Languages",
        keys: &[
            "javascript", "typescript", "python", "go", "rust", "php", "ruby", "java", "csharp",
            "swift", "kotlin", "dart",
        ],
    },
    IconGroup {
        name: "Frontend",
        keys: &[
            "react", "vue", "angular", "svelte", "nextjs", "astro", "tailwindcss", "html", "css",
        ],
    },
    IconGroup {
        name: "Backend/Runtime",
        keys: &[
            "nodejs", "deno", "bun", "express", "fastapi", "django", "rails", "laravel",
        ],
    },
    IconGroup {
        name: "Cloud/Infra",
        keys: &[
            "aws", "gcp", "azure", "vercel", "cloudflare", "netlify", "firebase", "supabase",
        ],
    },
    IconGroup {
        name: "DevOps/Tools",
        keys: &[
            "docker", "kubernetes", "terraform", "ansible", "github", "gitlab", "git", "linux",
            "ubuntu", "nginx",
        ],
    },
    IconGroup {
        name: "Database",
        keys: &["postgresql", "mysql", "mongodb", "redis", "sqlite", "prisma"],
    },
    IconGroup {
        name: "Mobile",
        keys: &["flutter", "reactnative", "android", "ios"],
    },
    IconGroup {
        name: "AI/ML",
        keys: &["openai", "anthropic", "tensorflow", "pytorch"],
    },
    IconGroup {
        name: "Other",
        keys: &["graphql", "vim", "vscode", "npm", "pnpm", FALLBACK_KEY],
    },
];

/// Look up an icon by key.
#[must_use]
pub fn lookup(key: &str) -> Option<&'static TechIcon> {
    CATALOG
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, icon)| icon)
}

/// Look up an icon by key, falling back to the `other` entry.
#[must_use]
pub fn resolve(key: &str) -> &'static TechIcon {
    lookup(key).unwrap_or(&OTHER)
}

/// Whether `key` names a catalog entry.
#[must_use]
pub fn is_known(key: &str) -> bool {
    lookup(key).is_some()
}

/// All catalog entries in declaration order.
pub fn entries() -> impl Iterator<Item = (&'static str, &'static TechIcon)> {
    CATALOG.iter().map(|(key, icon)| (*key, icon))
}

/// Picker groups in display order.
#[must_use]
pub fn groups() -> &'static [IconGroup] {
    GROUPS
}

/// Icons of one group that matched a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMatch {
    /// Group heading.
    pub name: &'static str,
    /// Matching entries, in group order.
    pub icons: Vec<(&'static str, &'static TechIcon)>,
}

/// Filter the picker groups by a case-insensitive query on key or label.
///
/// Groups with no matches are dropped. An empty query returns every group.
#[must_use]
pub fn search(query: &str) -> Vec<GroupMatch> {
    let query = query.trim().to_lowercase();
    GROUPS
        .iter()
        .filter_map(|group| {
            let icons: Vec<_> = group
                .keys
                .iter()
                .filter_map(|key| lookup(key).map(|icon| (*key, icon)))
                .filter(|(key, icon)| {
                    key.to_lowercase().contains(&query)
                        || icon.label.to_lowercase().contains(&query)
                })
                .collect();
            (!icons.is_empty()).then_some(GroupMatch {
                name: group.name,
                icons,
            })
        })
        .collect()
}
