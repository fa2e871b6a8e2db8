crate::define_id_enum! {
    /// Framework identifier, keyed the same way as the framework catalog
    FrameworkId {
        NextJs => "nextjs" : "Next.js" | "next",
        React => "react" : "React",
        Angular => "angular" : "Angular",
        Express => "express" : "Express",
        NestJs => "nestjs" : "NestJS" | "nest",
        Django => "django" : "Django",
        Flask => "flask" : "Flask",
        FastApi => "fastapi" : "FastAPI",
        Gin => "gin" : "Gin",
        Fiber => "fiber" : "Fiber",
        Echo => "echo" : "Echo",
        SpringBoot => "spring-boot" : "Spring Boot" | "springboot" | "spring",
        Laravel => "laravel" : "Laravel",
        Symfony => "symfony" : "Symfony",
        Rails => "rails" : "Rails" | "ruby-on-rails",
        Sinatra => "sinatra" : "Sinatra",
    }
}
