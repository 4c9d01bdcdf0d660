//! Entity pipeline definitions
//!
//! One [`EntityPipeline`] per searchable collection. The populate list is emitted first in
//! every pipeline so later stages can filter and search on populated fields
//! (`competency.name`, `courses.courseID.name`, ...).

use mongodb::bson::Document;

use super::populate::{exclude_fields, lookup, populate_many, populate_one, regroup, unwind};

/// Fields never returned for a user, whether queried directly or populated.
const USER_SECRET_FIELDS: &[&str] = &["password", "twoFactorCode", "twoFactorCodeExpires"];

/// Search configuration of one entity
#[derive(Debug, Clone, Copy)]
pub struct EntityPipeline {
    /// Route segment, e.g. `job-profiles`
    pub slug: &'static str,
    /// MongoDB collection
    pub collection: &'static str,
    /// Fields matched case-insensitively by `searchTerm`
    pub search_fields: &'static [&'static str],
    populate: fn() -> Vec<Document>,
}

impl EntityPipeline {
    /// Populate stages, emitted first in every pipeline.
    pub fn populate_stages(&self) -> Vec<Document> {
        (self.populate)()
    }

    /// Looks up an entity by route segment.
    pub fn by_slug(slug: &str) -> Option<&'static EntityPipeline> {
        ALL_ENTITIES.iter().copied().find(|e| e.slug == slug)
    }
}

fn no_populate() -> Vec<Document> {
    Vec::new()
}

pub static CATEGORY: EntityPipeline = EntityPipeline {
    slug: "categories",
    collection: "categories",
    search_fields: &["name", "description"],
    populate: no_populate,
};

pub static COMPETENCY: EntityPipeline = EntityPipeline {
    slug: "competencies",
    collection: "competencies",
    search_fields: &["name", "description"],
    populate: no_populate,
};

pub static SKILL: EntityPipeline = EntityPipeline {
    slug: "skills",
    collection: "skills",
    search_fields: &["name", "description", "competency.name", "categories.name"],
    populate: skill_populate,
};

fn skill_populate() -> Vec<Document> {
    vec![
        lookup("competencies", "competencyId", "competency"),
        unwind("competency", true),
        lookup("categories", "categoriesIDs", "categories"),
    ]
}

pub static COURSE: EntityPipeline = EntityPipeline {
    slug: "courses",
    collection: "courses",
    search_fields: &["name", "description", "category.name", "skills.name"],
    populate: course_populate,
};

fn course_populate() -> Vec<Document> {
    let mut stages = populate_many("skills", "skills");
    stages.extend(populate_one("categories", "category"));
    stages
}

pub static ROADMAP: EntityPipeline = EntityPipeline {
    slug: "roadmaps",
    collection: "roadmaps",
    search_fields: &[
        "name",
        "description",
        "courses.courseID.name",
        "courses.coursePreReq.name",
    ],
    populate: roadmap_populate,
};

fn roadmap_populate() -> Vec<Document> {
    let mut stages = vec![unwind("courses", true)];
    stages.extend(populate_one("courses", "courses.courseID"));
    stages.extend(populate_one("courses", "courses.coursePreReq"));
    stages.push(regroup(
        &[
            "name",
            "description",
            "totalPrice",
            "totalHours",
            "status",
            "discount",
            "learningPathHighlights",
            "createdAt",
            "updatedAt",
        ],
        "courses",
        &["courseID", "coursePreReq"],
    ));
    stages
}

pub static JOB_PROFILE: EntityPipeline = EntityPipeline {
    slug: "job-profiles",
    collection: "jobprofiles",
    search_fields: &[
        "name",
        "description",
        "education",
        "skillsNRequirements",
        "roadmapId.name",
        "jobProfileCategory.name",
        "competencies.competencyID.name",
    ],
    populate: job_profile_populate,
};

fn job_profile_populate() -> Vec<Document> {
    let mut stages = populate_one("roadmaps", "roadmapId");
    stages.extend(populate_many("categories", "jobProfileCategory"));
    stages.push(unwind("competencies", true));
    stages.extend(populate_one("competencies", "competencies.competencyID"));
    stages.push(regroup(
        &[
            "name",
            "description",
            "roadmapId",
            "jobProfileCategory",
            "education",
            "skillsNRequirements",
            "salaryRange",
            "marketDemand",
            "jobProfileVideos",
            "jobProfileImages",
            "createdAt",
            "updatedAt",
        ],
        "competencies",
        &["competencyID", "percentage", "formula"],
    ));
    stages
}

pub static QUESTION: EntityPipeline = EntityPipeline {
    slug: "questions",
    collection: "questions",
    search_fields: &["questionName", "options.text"],
    populate: no_populate,
};

pub static STUDENT: EntityPipeline = EntityPipeline {
    slug: "students",
    collection: "students",
    search_fields: &["userId.name", "userId.email", "educationalLevel"],
    populate: student_populate,
};

fn student_populate() -> Vec<Document> {
    let mut stages = populate_one("users", "userId");
    let secrets: Vec<String> = USER_SECRET_FIELDS
        .iter()
        .map(|f| format!("userId.{}", f))
        .collect();
    let secrets: Vec<&str> = secrets.iter().map(String::as_str).collect();
    stages.push(exclude_fields(&secrets));
    stages
}

pub static USER: EntityPipeline = EntityPipeline {
    slug: "users",
    collection: "users",
    search_fields: &["name", "email"],
    populate: user_populate,
};

fn user_populate() -> Vec<Document> {
    vec![exclude_fields(USER_SECRET_FIELDS)]
}

/// Every searchable entity.
pub static ALL_ENTITIES: &[&EntityPipeline] = &[
    &CATEGORY,
    &COMPETENCY,
    &SKILL,
    &COURSE,
    &ROADMAP,
    &JOB_PROFILE,
    &QUESTION,
    &STUDENT,
    &USER,
];
