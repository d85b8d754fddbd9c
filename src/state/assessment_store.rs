use crate::dto::assessment_dto::{
    CreateAssessmentPayload, QuestionPayload, UpdateQuestionPayload,
};
use crate::error::Result;
use crate::models::assessment::Assessment;
use crate::services::assessment_service::AssessmentService;
use crate::state::{optimistic, LoadPhase};

/// Builder-side cache: the full assessment list plus the assessment being
/// edited. Structural edits re-load from the durable store; question reorder
/// is optimistic with rollback.
pub struct AssessmentStore {
    service: AssessmentService,
    pub assessments: Vec<Assessment>,
    pub current: Option<Assessment>,
    pub phase: LoadPhase,
    pub error: Option<String>,
}

impl AssessmentStore {
    pub fn new(service: AssessmentService) -> Self {
        Self {
            service,
            assessments: Vec::new(),
            current: None,
            phase: LoadPhase::Idle,
            error: None,
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub async fn fetch_all(&mut self) {
        self.phase = LoadPhase::Loading;
        self.error = None;
        match self.service.get_all(None, None).await {
            Ok(assessments) => self.assessments = assessments,
            Err(err) => self.error = Some(err.to_string()),
        }
        self.phase = LoadPhase::Idle;
    }

    pub async fn load_for_job(&mut self, job_id: &str) {
        self.phase = LoadPhase::Loading;
        self.error = None;
        match self.service.get_for_job(job_id).await {
            Ok(assessment) => self.current = assessment,
            Err(err) => self.error = Some(err.to_string()),
        }
        self.phase = LoadPhase::Idle;
    }

    pub async fn create(
        &mut self,
        job_id: &str,
        payload: &CreateAssessmentPayload,
    ) -> Result<Assessment> {
        match self.service.create_for_job(job_id, payload).await {
            Ok(assessment) => {
                self.assessments.push(assessment.clone());
                self.current = Some(assessment.clone());
                Ok(assessment)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn add_section(&mut self, title: &str, description: Option<&str>) -> bool {
        let Some(assessment_id) = self.current.as_ref().map(|a| a.id.clone()) else {
            self.error = Some("No assessment selected".to_string());
            return false;
        };

        match self.service.add_section(&assessment_id, title, description).await {
            Ok(_) => {
                self.refresh_current(&assessment_id).await;
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub async fn delete_section(&mut self, section_id: &str) -> bool {
        let Some(assessment_id) = self.current.as_ref().map(|a| a.id.clone()) else {
            self.error = Some("No assessment selected".to_string());
            return false;
        };

        match self.service.delete_section(section_id).await {
            Ok(()) => {
                self.refresh_current(&assessment_id).await;
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub async fn add_question(&mut self, section_id: &str, payload: &QuestionPayload) -> bool {
        let Some(assessment_id) = self.current.as_ref().map(|a| a.id.clone()) else {
            self.error = Some("No assessment selected".to_string());
            return false;
        };

        match self.service.add_question(section_id, payload).await {
            Ok(_) => {
                self.refresh_current(&assessment_id).await;
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub async fn update_question(
        &mut self,
        question_id: &str,
        patch: &UpdateQuestionPayload,
    ) -> bool {
        let Some(assessment_id) = self.current.as_ref().map(|a| a.id.clone()) else {
            self.error = Some("No assessment selected".to_string());
            return false;
        };

        match self.service.update_question(question_id, patch).await {
            Ok(_) => {
                self.refresh_current(&assessment_id).await;
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Optimistic: splice and renumber the cached section immediately, roll
    /// back the whole current assessment if the durable write fails.
    pub async fn reorder_questions(
        &mut self,
        section_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> bool {
        if self.current.is_none() {
            self.error = Some("No assessment selected".to_string());
            return false;
        }

        let service = self.service.clone();
        let wanted = section_id.to_string();
        let result = optimistic::run(
            &mut self.current,
            |current| {
                if let Some(assessment) = current.as_mut() {
                    if let Some(section) =
                        assessment.sections.iter_mut().find(|s| s.id == wanted)
                    {
                        if from_index < section.questions.len()
                            && to_index < section.questions.len()
                        {
                            let moved = section.questions.remove(from_index);
                            section.questions.insert(to_index, moved);
                            for (index, question) in section.questions.iter_mut().enumerate() {
                                question.sort_order = index as i64;
                            }
                        }
                    }
                }
            },
            {
                let section = section_id.to_string();
                async move {
                    service
                        .reorder_questions(&section, from_index, to_index)
                        .await
                }
            },
        )
        .await;

        match result {
            Ok(()) => true,
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub async fn publish(&mut self) -> bool {
        let Some(assessment_id) = self.current.as_ref().map(|a| a.id.clone()) else {
            self.error = Some("No assessment selected".to_string());
            return false;
        };

        match self.service.publish(&assessment_id).await {
            Ok(assessment) => {
                self.current = Some(assessment);
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    async fn refresh_current(&mut self, assessment_id: &str) {
        match self.service.get_by_id(assessment_id).await {
            Ok(assessment) => self.current = assessment,
            Err(err) => self.error = Some(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::AssessmentStatus;
    use crate::models::question::QuestionType;
    use crate::test_utils::{assessment_service, create_job, question_payload, setup_test_db};

    async fn store_with_assessment() -> (AssessmentStore, String) {
        let pool = setup_test_db().await;
        let job = create_job(&pool, "Backend Engineer").await;
        let mut store = AssessmentStore::new(assessment_service(&pool));
        let assessment = store
            .create(
                &job.id,
                &CreateAssessmentPayload {
                    title: "Backend Screen".to_string(),
                    description: None,
                    config: None,
                },
            )
            .await
            .unwrap();
        let section_id = assessment.sections[0].id.clone();
        (store, section_id)
    }

    #[tokio::test]
    async fn question_edits_reload_the_current_assessment() {
        let (mut store, section_id) = store_with_assessment().await;

        assert!(store.add_question(&section_id, &question_payload(QuestionType::Mcq)).await);
        assert!(store.add_question(&section_id, &question_payload(QuestionType::ShortText)).await);

        let current = store.current.as_ref().unwrap();
        assert_eq!(current.sections[0].questions.len(), 2);
    }

    #[tokio::test]
    async fn optimistic_reorder_rolls_back_on_bad_indices() {
        let (mut store, section_id) = store_with_assessment().await;
        store.add_question(&section_id, &question_payload(QuestionType::Mcq)).await;
        store.add_question(&section_id, &question_payload(QuestionType::ShortText)).await;

        let snapshot = store.current.clone();
        // The durable write rejects the indices; the cached copy must revert.
        assert!(!store.reorder_questions(&section_id, 0, 9).await);
        assert_eq!(store.current, snapshot);
        assert!(store.error.is_some());
    }

    #[tokio::test]
    async fn reorder_renumbers_the_cached_questions() {
        let (mut store, section_id) = store_with_assessment().await;
        for _ in 0..3 {
            store.add_question(&section_id, &question_payload(QuestionType::ShortText)).await;
        }

        assert!(store.reorder_questions(&section_id, 0, 2).await);
        let current = store.current.as_ref().unwrap();
        let orders: Vec<i64> = current.sections[0].questions.iter().map(|q| q.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn publish_updates_the_cached_status() {
        let (mut store, _) = store_with_assessment().await;
        assert!(store.publish().await);
        assert_eq!(
            store.current.as_ref().unwrap().status,
            AssessmentStatus::Published
        );
    }
}
