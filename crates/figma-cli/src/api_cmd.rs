use std::time::Duration;

use figma_client::FigmaClientFactory;
use figma_core::traits::FigmaApi;
use figma_core::types::Credential;

fn client(api_base: &str, token: &str) -> anyhow::Result<impl FigmaApi> {
    let factory = FigmaClientFactory::new(api_base, Duration::from_secs(30))?;
    Ok(factory.client(Credential::new(token)))
}

/// Print the projects of a team.
pub async fn team_projects(api_base: &str, token: &str, team_id: &str) -> anyhow::Result<()> {
    let projects = client(api_base, token)?.get_team_projects(team_id).await?;
    println!("{}", serde_json::to_string_pretty(&projects)?);
    Ok(())
}

/// Print the files of a project.
pub async fn project_files(api_base: &str, token: &str, project_id: &str) -> anyhow::Result<()> {
    let files = client(api_base, token)?.get_project_files(project_id).await?;
    println!("{}", serde_json::to_string_pretty(&files)?);
    Ok(())
}
