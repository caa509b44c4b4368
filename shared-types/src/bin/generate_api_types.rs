use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Contact types
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(ContactCategory::export_to_string()?));
    types.push(clean_type(ContactStatus::export_to_string()?));
    types.push(clean_type(TagsInput::export_to_string()?));
    types.push(clean_type(ContactInput::export_to_string()?));
    types.push(clean_type(ContactsResponse::export_to_string()?));
    types.push(clean_type(SaveContactResponse::export_to_string()?));
    types.push(clean_type(ImportContactsResponse::export_to_string()?));

    // Event types
    types.push(clean_type(Event::export_to_string()?));
    types.push(clean_type(EventsResponse::export_to_string()?));

    // Template library types
    types.push(clean_type(EmailTemplate::export_to_string()?));
    types.push(clean_type(CreateTemplateRequest::export_to_string()?));
    types.push(clean_type(TemplatesResponse::export_to_string()?));

    // Settings types
    types.push(clean_type(ApiKeyConfig::export_to_string()?));
    types.push(clean_type(EmailDeliveryConfig::export_to_string()?));
    types.push(clean_type(BackendStatus::export_to_string()?));
    types.push(clean_type(SettingsResponse::export_to_string()?));
    types.push(clean_type(UpdateApiKeysRequest::export_to_string()?));
    types.push(clean_type(UpdateBackendRequest::export_to_string()?));
    types.push(clean_type(UpdateLogoRequest::export_to_string()?));
    types.push(clean_type(SaveSettingsResponse::export_to_string()?));

    // AI types
    types.push(clean_type(CardFields::export_to_string()?));
    types.push(clean_type(EnrichedContact::export_to_string()?));
    types.push(clean_type(GroundingSource::export_to_string()?));
    types.push(clean_type(ScanCardRequest::export_to_string()?));
    types.push(clean_type(ScanCardResponse::export_to_string()?));
    types.push(clean_type(EnrichRequest::export_to_string()?));
    types.push(clean_type(EnrichmentResponse::export_to_string()?));
    types.push(clean_type(EditImageRequest::export_to_string()?));
    types.push(clean_type(EditImageResponse::export_to_string()?));

    // Campaign and report types
    types.push(clean_type(GenerateCampaignRequest::export_to_string()?));
    types.push(clean_type(CampaignContentResponse::export_to_string()?));
    types.push(clean_type(SendCampaignRequest::export_to_string()?));
    types.push(clean_type(CampaignFailure::export_to_string()?));
    types.push(clean_type(SendCampaignResponse::export_to_string()?));
    types.push(clean_type(ReportSummary::export_to_string()?));

    let output_dir = Path::new("../gui/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Check if the type definition includes imports (like ScanCardResponse which imports CardFields)
    let lines: Vec<&str> = type_def.lines().collect();
    let has_import = lines
        .iter()
        .any(|line| line.trim().starts_with("import type"));

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            // Keep import lines if they're part of a type definition
            if trimmed.starts_with("import type") {
                return has_import;
            }
            // Filter out the generated comment line
            !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .cloned()
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
