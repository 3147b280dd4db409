use serde::{Deserialize, Serialize};

crate::define_id_enum! {
    /// Framework identifier. Slugs are what profiles serialize.
    FrameworkId {
        Django => "django" : "Django",
        Flask => "flask" : "Flask",
        FastApi => "fastapi" : "FastAPI",
        Spring => "spring" : "Spring",
        SpringBoot => "spring-boot" : "Spring Boot" | "springboot",
        Quarkus => "quarkus" : "Quarkus",
        Micronaut => "micronaut" : "Micronaut",
        Vertx => "vertx" : "Vert.x" | "vert.x",
        Express => "express" : "Express",
        Nest => "nest" : "NestJS" | "nestjs",
        React => "react" : "React",
        Vue => "vue" : "Vue",
        Angular => "angular" : "Angular",
        NextJs => "nextjs" : "Next.js" | "next",
        Gin => "gin" : "Gin",
        Echo => "echo" : "Echo",
        Fiber => "fiber" : "Fiber",
        Beego => "beego" : "Beego",
    }
}

/// Coarse classification used to split `frameworks` into the category lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkCategory {
    Frontend,
    Backend,
    Mobile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_id_serialization() {
        assert_eq!(
            serde_json::to_string(&FrameworkId::SpringBoot).unwrap(),
            "\"spring-boot\""
        );
        assert_eq!(
            serde_json::to_string(&FrameworkId::Custom("remix".into())).unwrap(),
            "\"remix\""
        );
    }

    #[test]
    fn test_framework_id_deserialization() {
        let id: FrameworkId = serde_json::from_str("\"nestjs\"").unwrap();
        assert_eq!(id, FrameworkId::Nest);
        let id: FrameworkId = serde_json::from_str("\"remix\"").unwrap();
        assert_eq!(id, FrameworkId::Custom("remix".to_string()));
    }

    #[test]
    fn test_from_name_accepts_display_and_alias() {
        assert_eq!(FrameworkId::from_name("Next.js"), Some(FrameworkId::NextJs));
        assert_eq!(FrameworkId::from_name("next"), Some(FrameworkId::NextJs));
        assert_eq!(FrameworkId::from_name("FASTAPI"), Some(FrameworkId::FastApi));
        assert_eq!(FrameworkId::from_name("rails"), None);
    }

    #[test]
    fn test_all_variants_round_trip_slugs() {
        for id in FrameworkId::all_variants() {
            assert_eq!(FrameworkId::from_name(id.slug()).as_ref(), Some(id));
        }
    }
}
