use crate::pipeline::state::PipelineState;
use crate::pipeline::types::{AnalysisResult, ImageHandle};

/// What the analysis area shows for a pipeline state. Rebuilt every frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    FeaturePreview,
    Loading,
    Results(ResultsPanel),
    Failure { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPanel {
    pub thumbnail: ImageHandle,
    pub cards: Vec<AnalysisCard>,
    pub prediction: String,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisCard {
    pub title: &'static str,
    pub value: Option<String>,
    pub lines: Vec<CardLine>,
    pub accent: Accent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardLine {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Cyan,
    Green,
    Yellow,
    Purple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Positive,
    Negative,
}

pub fn present(state: &PipelineState) -> Presentation {
    match state {
        PipelineState::Idle => Presentation::FeaturePreview,
        PipelineState::Loading { .. } => Presentation::Loading,
        PipelineState::Success { image, result } => Presentation::Results(ResultsPanel {
            thumbnail: image.clone(),
            cards: result_cards(result),
            prediction: result.prediction.clone(),
            result: result.clone(),
        }),
        PipelineState::Error { message, .. } => Presentation::Failure {
            message: message.clone(),
        },
    }
}

fn result_cards(result: &AnalysisResult) -> Vec<AnalysisCard> {
    let mut levels = Vec::new();
    if result.support.is_some() || result.resistance.is_some() {
        levels.push(CardLine {
            text: format!("Support: {}", format_level(result.support)),
            tone: Tone::Positive,
        });
        levels.push(CardLine {
            text: format!("Resistance: {}", format_level(result.resistance)),
            tone: Tone::Negative,
        });
    }

    vec![
        AnalysisCard {
            title: "Pattern",
            value: Some(result.pattern.clone()),
            lines: vec![CardLine {
                text: format_confidence(result.confidence),
                tone: Tone::Muted,
            }],
            accent: Accent::Cyan,
        },
        AnalysisCard {
            title: "Key Levels",
            value: None,
            lines: levels,
            accent: Accent::Green,
        },
        AnalysisCard {
            title: "Trend",
            value: Some(result.trend.clone()),
            lines: Vec::new(),
            accent: Accent::Yellow,
        },
        AnalysisCard {
            title: "Volume",
            value: Some(result.volume.clone()),
            lines: Vec::new(),
            accent: Accent::Purple,
        },
    ]
}

pub fn format_confidence(confidence: f64) -> String {
    format!("Confidence: {:.1}%", confidence * 100.0)
}

fn format_level(level: Option<f64>) -> String {
    level.map(format_price).unwrap_or_else(|| "n/a".to_string())
}

/// `$41,200` or `$41,200.50`; whole prices drop the cents.
pub fn format_price(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, fraction) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    if fraction == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{fraction:02}")
    }
}
