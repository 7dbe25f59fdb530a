//! Integration tests for the cost engine.
//!
//! These tests drive the public API end to end:
//! 1. A stored project record is parsed from its JSON layout
//! 2. Each scenario is aggregated into a total and breakdown
//! 3. Scenarios are compared side by side through a selection
//! 4. The same flow runs through the query handlers over a loaded workspace

use std::sync::Arc;

use monarch::adapters::InMemoryProjectRepository;
use monarch::application::{
    AnalyzeScenarioHandler, AnalyzeScenarioQuery, CompareScenariosHandler, CompareScenariosQuery,
    ProjectWorkspace,
};
use monarch::domain::analysis::{aggregate, compare, normalize, MatrixCell, ScenarioSelection};
use monarch::domain::costing::{CostType, Project};
use monarch::domain::foundation::ScenarioId;
use monarch::ports::ProjectRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

const STORED_PROJECT: &str = r#"{
    "id": "p-chatbot",
    "name": "Chatbot SaaS",
    "description": "LLM wrapper",
    "lastUpdated": 1717171717171,
    "currencySymbol": "€",
    "scenarios": [
        {
            "id": "base",
            "name": "Base Case",
            "description": "GPT-4 on managed hosting",
            "components": [
                {
                    "id": "c1",
                    "name": "Tokens",
                    "costType": "Unit Based Cost",
                    "quantity": 50000,
                    "pricePerUnit": 0.002,
                    "unitDenominator": 1000,
                    "unitMeasurement": "Tokens"
                },
                {
                    "id": "c2",
                    "name": "Hosting",
                    "costType": "Fixed Recurring Cost",
                    "pricePerUnit": 120,
                    "recurrence": "Yearly"
                },
                {
                    "id": "c3",
                    "name": "Setup",
                    "costType": "One Time Cost",
                    "pricePerUnit": 500
                }
            ]
        },
        {
            "id": "lean",
            "name": "Lean",
            "description": "Self hosted",
            "components": [
                {
                    "id": "c4",
                    "name": "Hosting",
                    "costType": "Fixed Recurring Cost",
                    "pricePerUnit": 40
                },
                {
                    "id": "c5",
                    "name": "Refund",
                    "costType": "One Time Cost",
                    "pricePerUnit": -15
                },
                {
                    "id": "c6",
                    "name": "Legacy",
                    "costType": "Barter Cost",
                    "pricePerUnit": 99
                }
            ]
        }
    ]
}"#;

fn stored_project() -> Project {
    serde_json::from_str(STORED_PROJECT).expect("stored project parses")
}

fn id(raw: &str) -> ScenarioId {
    ScenarioId::parse(raw).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================================
// Pure engine
// =============================================================================

#[test]
fn stored_project_aggregates_per_scenario() {
    let project = stored_project();
    let base = aggregate(&project.scenarios[0]);

    assert!(approx(base.total_cost, 510.1));
    let names: Vec<_> = base.breakdown.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Tokens", "Hosting", "Setup"]);
    assert_eq!(base.primary_driver().unwrap().name, "Setup");
    assert_eq!(base.breakdown[2].cost_type, CostType::OneTime);
    let percent_sum: f64 = base.breakdown.iter().map(|e| e.percent).sum();
    assert!(approx(percent_sum, 100.0));
}

#[test]
fn negative_and_unknown_components_affect_only_the_total() {
    let project = stored_project();
    let lean = &project.scenarios[1];

    assert_eq!(normalize(&lean.components[2]), 0.0);
    let result = aggregate(lean);
    assert!(approx(result.total_cost, 25.0));
    assert_eq!(result.breakdown.len(), 1);
    assert_eq!(result.breakdown[0].name, "Hosting");
}

#[test]
fn comparison_matrix_covers_selected_scenarios() {
    let project = stored_project();
    let selection = ScenarioSelection::initial(&project.scenarios);
    let matrix = compare(&project.scenarios, &selection);

    let names: Vec<_> = matrix.names().collect();
    assert_eq!(names, vec!["Hosting", "Legacy", "Refund", "Setup", "Tokens"]);
    assert_eq!(matrix.cell("Hosting", &id("lean")), Some(MatrixCell::Cost(40.0)));
    assert_eq!(matrix.cell("Refund", &id("lean")), Some(MatrixCell::NoValue));
    assert_eq!(matrix.cell("Tokens", &id("lean")), Some(MatrixCell::NoValue));
    assert_eq!(
        matrix.cell("Setup", &id("base")).unwrap().render(project.currency_symbol()),
        "€500.00"
    );
    assert!(approx(matrix.total(&id("lean")).unwrap(), 25.0));
}

#[test]
fn stored_layout_survives_a_save() {
    let project = stored_project();
    let json = serde_json::to_value(&project).unwrap();

    assert_eq!(json["scenarios"][0]["components"][1]["recurrence"], "Yearly");
    assert_eq!(json["scenarios"][0]["components"][0]["unitDenominator"], 1000.0);
    assert!(json["scenarios"][0]["components"][2].get("quantity").is_none());
}

#[test]
fn unknown_cost_type_is_saved_back_unchanged() {
    let project = stored_project();
    let json = serde_json::to_value(&project).unwrap();

    let legacy = &json["scenarios"][1]["components"][2];
    assert_eq!(legacy["costType"], "Barter Cost");
    assert_eq!(legacy["pricePerUnit"], 99);
    assert_eq!(legacy["name"], "Legacy");

    let reparsed: Project = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(normalize(&reparsed.scenarios[1].components[2]), 0.0);
    assert_eq!(serde_json::to_value(&reparsed).unwrap(), json);
}

// =============================================================================
// Query handlers
// =============================================================================

async fn loaded_workspace(project: &Project) -> (ProjectWorkspace, Arc<InMemoryProjectRepository>) {
    let repo = Arc::new(InMemoryProjectRepository::with_projects(vec![project.clone()]));
    let workspace = ProjectWorkspace::new(repo.clone());
    assert_eq!(workspace.load().await, 1);
    (workspace, repo)
}

#[tokio::test]
async fn handlers_analyse_and_compare_stored_project() {
    let project = stored_project();
    let (workspace, _repo) = loaded_workspace(&project).await;

    let analysis = AnalyzeScenarioHandler::new(workspace.clone())
        .handle(AnalyzeScenarioQuery {
            project_id: project.id.clone(),
            scenario_id: id("base"),
        })
        .await
        .unwrap();
    assert_eq!(analysis.formatted_total(), "€510.10");

    let comparison = CompareScenariosHandler::new(workspace)
        .handle(CompareScenariosQuery {
            project_id: project.id.clone(),
            scenario_ids: Some(vec![id("lean")]),
        })
        .await
        .unwrap();
    assert_eq!(comparison.matrix.columns.len(), 1);
    assert_eq!(comparison.matrix.columns[0].scenario_name, "Lean");
    assert_eq!(comparison.currency_symbol, "€");
}

#[tokio::test]
async fn unrelated_edit_keeps_unknown_cost_type_in_store() {
    let project = stored_project();
    let (workspace, repo) = loaded_workspace(&project).await;

    let write = workspace
        .update_scenario_details(&project.id, &id("base"), "Base Case v2", "")
        .await
        .unwrap();
    ProjectWorkspace::settle([write]).await;

    let stored = serde_json::to_value(repo.find(&project.id).await.unwrap()).unwrap();
    assert_eq!(stored["scenarios"][0]["name"], "Base Case v2");
    let legacy = &stored["scenarios"][1]["components"][2];
    assert_eq!(legacy["costType"], "Barter Cost");
    assert_eq!(legacy["pricePerUnit"], 99);
}
