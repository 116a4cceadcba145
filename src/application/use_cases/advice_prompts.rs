// ============================================================
// ADVICE PROMPTS
// ============================================================
// Pure builders for every prompt sent to the advice model

use crate::domain::csv::title_case;
use crate::domain::dictionary::DataDictionary;
use crate::domain::error::{AppError, Result};
use crate::domain::profile::UserProfile;
use crate::domain::statistics::DatasetStatistics;

/// Research summary embedded in every full advice prompt
pub const WOMENS_HEALTH_RESEARCH: &str =
    include_str!("../../../assets/womens_health_research.md");

const KEY_METRIC_LIMIT: usize = 5;

/// Compact markdown digest of the analysis results.
pub fn build_stats_summary(stats: &[DatasetStatistics]) -> Result<String> {
    if stats.is_empty() {
        return Err(AppError::NoAnalysis);
    }

    let mut summary = String::from("## Health Data Summary\n\n");
    for dataset in stats {
        summary.push_str(&format!("### {}\n", title_case(&dataset.dataset_name)));
        summary.push_str(&format!("- Records: {} days of data\n", dataset.shape.0));
        summary.push_str(&format!("- Columns: {}\n", dataset.columns.len()));

        if !dataset.numeric_summary.is_empty() {
            summary.push_str("- Key Metrics:\n");
            for metric in dataset.numeric_summary.iter().take(KEY_METRIC_LIMIT) {
                summary.push_str(&format!(
                    "  - {}: Mean = {}, Std = {}\n",
                    metric.column,
                    fmt_2dp(metric.mean),
                    fmt_2dp(metric.std)
                ));
            }
        }

        let missing_total = dataset.total_missing();
        if missing_total > 0 {
            summary.push_str(&format!(
                "- Missing data: {} total missing values\n",
                missing_total
            ));
        }
        summary.push('\n');
    }

    Ok(summary)
}

fn fmt_2dp(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "nan".to_string(),
    }
}

/// Free-text advice prompt with the four recommendation sections.
pub fn build_advice_prompt(
    profile: &UserProfile,
    dictionary: &DataDictionary,
    stats: &[DatasetStatistics],
    knowledge: &str,
) -> Result<String> {
    let stats_summary = build_stats_summary(stats)?;
    let name = profile.display_name();

    let mut prompt = String::new();
    prompt.push_str(
        "You are a health and performance expert analyzing Oura Ring data for a client. \
         Please provide personalized, science-backed advice based on the data analysis and user profile below.\n\n",
    );

    prompt.push_str("## User Profile\n");
    prompt.push_str(&format!("Name: {}\n", name));
    prompt.push_str(&format!("Age: {}\n", profile.age_label()));
    prompt.push_str(&format!("Goals: {}\n", profile.goals_label()));
    if let Some(level) = profile.activity_level.as_deref().filter(|l| !l.trim().is_empty()) {
        prompt.push_str(&format!("Activity Level: {}\n", level));
    }
    if !profile.focus_areas.is_empty() {
        prompt.push_str(&format!("Focus Areas: {}\n", profile.focus_areas.join(", ")));
    }
    for (key, value) in &profile.extra {
        prompt.push_str(&format!("{}: {}\n", key, value));
    }

    prompt.push_str("\n## Data Dictionary Context\n");
    prompt.push_str(
        "The following data comes from an Oura Ring, which tracks various health metrics:\n\n",
    );
    prompt.push_str(&dictionary.to_pretty_json());
    prompt.push_str("\n\n## Health Data Analysis\n");
    prompt.push_str(&stats_summary);

    prompt.push_str("\n## Instructions\n");
    prompt.push_str(
        "Based on this data analysis and the user's profile, provide comprehensive, actionable advice.\n\
         Your advice should be specific to women. Use the following markdown scientific report on research for women's health to guide you.\n",
    );
    prompt.push_str(knowledge);
    prompt.push_str("\n\n");

    prompt.push_str(ADVICE_SECTIONS);
    prompt.push_str(&format!(
        "begin response with '{}'s Personalized Health Advice:' and ensure the response is concise yet comprehensive.",
        name
    ));

    Ok(prompt)
}

const ADVICE_SECTIONS: &str = r#"Structure your response with the following sections:

### Behavioral Recommendations
Provide specific lifestyle and daily habit recommendations based on the data patterns observed.

### Exercise Recommendations
Suggest specific workout types, intensities, timing, and recovery protocols based on the readiness, activity, and cardiovascular data.

### Nutrition Recommendations
Recommend dietary strategies that align with the observed sleep, recovery, and performance patterns.

### Supplementation Recommendations
Suggest evidence-based supplements that could support the user's goals and address any deficiencies suggested by the data.

Make sure all recommendations are:
- Science-backed with brief explanations of the reasoning
- Specific and actionable
- Tailored to the user's age, goals, and data patterns
- Realistic for implementation
- take into account the menstrual cycle

Focus on the most impactful recommendations rather than overwhelming with too many suggestions.
"#;

/// Advice prompt plus the JSON shape the reply must follow.
pub fn build_structured_advice_prompt(
    profile: &UserProfile,
    dictionary: &DataDictionary,
    stats: &[DatasetStatistics],
    knowledge: &str,
) -> Result<String> {
    let mut prompt = build_advice_prompt(profile, dictionary, stats, knowledge)?;
    let name = profile.display_name();

    let age = profile
        .age
        .map(|age| age.to_string())
        .unwrap_or_else(|| json_string(&profile.age_label()));
    let focus_areas =
        serde_json::to_string(&profile.focus_areas).unwrap_or_else(|_| "[]".to_string());

    prompt.push_str("\n\nPlease provide your response in the following JSON format:\n\n");
    prompt.push_str(&format!(
        r#"{{
  "title": {title},
  "user_profile": {{
    "name": {name},
    "age": {age},
    "focus_areas": {focus_areas}
  }},
  "sections": {{
{behavioral},
{exercise},
{nutrition},
{supplementation}
  }}
}}"#,
        title = json_string(&format!("{}'s Personalized Health Advice", name)),
        name = json_string(name),
        age = age,
        focus_areas = focus_areas,
        behavioral = schema_section("behavioral", "Behavioral Recommendations", "🧠"),
        exercise = schema_section("exercise", "Exercise Recommendations", "💪"),
        nutrition = schema_section("nutrition", "Nutrition Recommendations", "🥗"),
        supplementation = schema_section("supplementation", "Supplementation Recommendations", "💊"),
    ));
    prompt.push_str(&format!(
        "\n\nProvide 2-4 specific, actionable recommendations per section. \
         Make sure all recommendations are science-backed and personalized to {}'s data patterns.",
        name
    ));

    Ok(prompt)
}

fn schema_section(key: &str, title: &str, icon: &str) -> String {
    format!(
        r#"    "{key}": {{
      "title": "{title}",
      "icon": "{icon}",
      "recommendations": [
        {{
          "title": "Recommendation title",
          "description": "Detailed description of the recommendation",
          "reasoning": "Brief scientific reasoning behind this recommendation",
          "actionable_steps": ["Step 1", "Step 2", "Step 3"]
        }}
      ]
    }}"#
    )
}

fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

/// Three flippable program cards built on top of earlier advice.
pub fn build_daily_programs_prompt(profile: &UserProfile, prior_advice: &str) -> String {
    let name = profile.display_name();

    let mut prompt = format!(
        "Based on the existing advice that you have on {} and her metadata:\n{}\n\n",
        name, prior_advice
    );
    prompt.push_str(
        "IMPORTANT: You must respond ONLY with valid JSON. Do not include any text before or after the JSON. \
         Do not use markdown formatting. Respond with pure JSON only.\n\n\
         Please provide 3 different daily programmes that will be displayed as flippable cards.\n\
         The daily programmes should pertain to one activity only, be that one full workout, one breathing exercise routine or one day's meal plan.\n\
         The meal plan should only contain breakfast, lunch, dinner and 1 snack.\n\n\
         Each card should have actionable items on the front and scientific backing on the back. Use this exact JSON format:\n\n",
    );

    prompt.push_str(&format!(
        r#"{{
  "title": {title},
  "cards": [
    {{
      "title": "Movement",
      "items": [
        "Burpees 60 seconds",
        "Shoulder taps 60 seconds",
        "V Ups 60 seconds",
        "30 Second rest",
        "Repeat x5"
      ],
      "description": "2-3 sentence explanation of why this movement program works specifically for {name} based on her Oura data patterns, menstrual cycle phase, and health goals. Mention specific benefits for performance optimization and recovery.",
      "sources": [
        {{"name": "High-Intensity Interval Training in Women", "url": "https://pubmed.ncbi.nlm.nih.gov/29765853/"}},
        {{"name": "Exercise and Menstrual Cycle Performance", "url": "https://doi.org/10.1249/MSS.0000000000001946"}}
      ]
    }},
    {{
      "title": "Mindfulness",
      "items": [
        "The 4-2-8 Breathing Method",
        "Inhale: Breathe in slowly and deeply through your nose for a count of four.",
        "Hold: Hold your breath for a count of two.",
        "Exhale: Exhale slowly and completely through your mouth for a count of eight.",
        "Repeat: Repeat this cycle for 5-10 minutes, or until you feel calmer."
      ],
      "description": "2-3 sentence explanation of why this mindfulness program works specifically for {name} based on her stress patterns, HRV data, and cycle phase. Mention benefits for stress resilience and sleep optimization.",
      "sources": [
        {{"name": "Breathing Techniques for Stress Reduction", "url": "https://pubmed.ncbi.nlm.nih.gov/31376606/"}},
        {{"name": "HRV Biofeedback and Autonomic Function", "url": "https://doi.org/10.1016/j.brat.2019.103432"}}
      ]
    }},
    {{
      "title": "Nutrition",
      "items": [
        "BREAKFAST: Granola with Greek Yogurt and blueberries and honey",
        "LUNCH: Salmon and quinoa salad with kale",
        "DINNER: Paprika chicken with brown rice and broccoli",
        "SNACK: Mixed nuts and apple slices"
      ],
      "description": "2-3 sentence explanation of why this nutrition program works specifically for {name} based on her activity levels, recovery patterns, and cycle phase. Mention benefits for performance and hormonal balance.",
      "sources": [
        {{"name": "Nutrition Timing for Athletic Performance", "url": "https://pubmed.ncbi.nlm.nih.gov/32034384/"}},
        {{"name": "Protein Requirements for Female Athletes", "url": "https://doi.org/10.1093/advances/nmz090"}}
      ]
    }}
  ]
}}"#,
        title = json_string(&format!("{}'s Daily Health Programs", name)),
        name = name,
    ));

    prompt.push_str(&format!(
        "\n\nCRITICAL:\n\
         - Each item should be part of a programme that you are giving the user. Each item should therefore have enough detail for the user to carry out the activity without any outside help.\n\
         - For Movement cards: Do NOT include warm-ups or cool-downs. Focus only on the main exercise routine.\n\
         - For Nutrition cards: ALWAYS structure as \"BREAKFAST: ...\", \"LUNCH: ...\", \"DINNER: ...\", \"SNACK: ...\" for easy parsing into subheadings.\n\
         - Descriptions should reference {}'s actual data patterns and be personalized\n\
         - Sources should be objects with \"name\" (descriptive paper title) and \"url\" (actual PubMed/DOI link) properties\n\
         - Your response must be valid JSON only. No explanatory text. No markdown. Just JSON.",
        name
    ));

    prompt
}

/// Markdown variant of the daily programs request.
pub fn build_daily_advice_prompt(profile: &UserProfile, prior_advice: &str) -> String {
    let name = profile.display_name();

    let mut prompt = format!(
        "Based on the existing advice that you have on {} and her metadata:\n{}\n\n",
        name, prior_advice
    );
    prompt.push_str(
        r#"Suggest 3 different daily programmes. They should be structured as:
## Movement
Suggest a movement programme for today based on the health advice.
Give one workout/activity only and give details on it + why it's good
## Mindfulness
Suggest a mindfulness programme for today based on the health advice.
Give one workout/activity only and give details on it + why it's good
## Nutrition
Suggest a nutrition programme for today based on the health advice.
Give actual meal ideas and details on why they are good for the user.
The meal plan should only contain breakfast, lunch, dinner and 1 snack. Do not give pre or post workout meals or any other meals.

Only do one programme, assume user is in early stage of cycle.
In all cases, explain why it is good, relevant to the user's own data!
Begin response with: Here are some ideas for you to try today to achieve your goals
"#,
    );
    prompt
}
