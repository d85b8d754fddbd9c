//! Full hiring-pipeline walkthrough: post a job, take an application through
//! stage changes, archive the posting, then build and publish an assessment.

use talentflow::dto::assessment_dto::CreateAssessmentPayload;
use talentflow::dto::candidate_dto::ApplyPayload;
use talentflow::dto::job_dto::CreateJobPayload;
use talentflow::models::candidate::Stage;
use talentflow::models::job::{EmploymentType, JobStatus};
use talentflow::models::question::QuestionType;
use talentflow::models::timeline::TimelineKind;
use talentflow::services::job_service::{JobService, ReorderSimulation};
use talentflow::test_utils::{assessment_service, candidate_service, question_payload, setup_test_db};

#[tokio::test]
async fn hiring_pipeline_end_to_end() {
    let pool = setup_test_db().await;
    let jobs = JobService::with_simulation(pool.clone(), ReorderSimulation::off());
    let candidates = candidate_service(&pool);
    let assessments = assessment_service(&pool);

    // First job lands at the top of the board.
    let job = jobs
        .create_job(&CreateJobPayload {
            title: "Backend Engineer".to_string(),
            slug: None,
            department: "Engineering".to_string(),
            location: "Remote".to_string(),
            employment_type: EmploymentType::FullTime,
            salary: "90-120k".to_string(),
            description: "Own the data layer".to_string(),
            requirements: vec!["Rust".to_string()],
            tags: vec!["backend".to_string()],
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(job.sort_order, 0);
    assert_eq!(job.status, JobStatus::Active);

    // Application puts the candidate at the start of the pipeline.
    let candidate = candidates
        .apply_to_job(
            &job.id,
            &ApplyPayload {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                phone: None,
                skills: vec!["Rust".to_string()],
                source: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(candidate.stage, Stage::Applied);

    let timeline = candidates.get_timeline(&candidate.id).await.unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].kind, TimelineKind::Application);

    // Stage move appends without touching the application entry.
    candidates
        .update_stage(&candidate.id, Stage::Tech)
        .await
        .unwrap();
    let timeline = candidates.get_timeline(&candidate.id).await.unwrap();
    let change = timeline
        .iter()
        .find(|e| e.kind == TimelineKind::StageChange)
        .expect("stage change entry");
    assert_eq!(change.to_stage, Some(Stage::Tech));
    let application = timeline
        .iter()
        .find(|e| e.kind == TimelineKind::Application)
        .expect("application entry");
    assert_eq!(application.description, "Application submitted");
    assert_eq!(application.to_stage, Some(Stage::Applied));

    // Bulk-archive the posting.
    let archived = jobs
        .bulk_archive(&[job.id.clone()], JobStatus::Archived)
        .await
        .unwrap();
    assert_eq!(archived, 1);
    let job = jobs.get_job(&job.id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Archived);

    // New assessments come seeded with their default section.
    let assessment = assessments
        .create_for_job(
            &job.id,
            &CreateAssessmentPayload {
                title: "Backend Screen".to_string(),
                description: None,
                config: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(assessment.sections.len(), 1);
    assert_eq!(assessment.sections[0].title, "Default Section");

    // First question in a fresh section: order 0, default score.
    let mut mcq = question_payload(QuestionType::Mcq);
    mcq.options = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let question = assessments
        .add_question(&assessment.sections[0].id, &mcq)
        .await
        .unwrap();
    assert_eq!(question.sort_order, 0);
    assert_eq!(question.score, 10);
    assert_eq!(question.options.len(), 3);

    // Invite the candidate to take it.
    let invite = assessments
        .send_invite(&candidate.id, &assessment.id)
        .await
        .unwrap();
    assert_eq!(invite.candidate_email, "jane@x.com");
    assert!(!invite.token.is_empty());
}
