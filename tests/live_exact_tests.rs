mod common;

use deckforge::live::LiveType;
use deckforge::live_exact::LiveExactCalculator;
use deckforge::music::{MusicNote, MusicScore, MusicTimedPoint};

fn chart(note_times: &[f64], skill_times: &[f64], fever_times: &[f64]) -> MusicScore {
    MusicScore {
        notes: note_times
            .iter()
            .map(|&time| MusicNote { time, kind: 1 })
            .collect(),
        skills: skill_times
            .iter()
            .map(|&time| MusicTimedPoint { time })
            .collect(),
        fevers: fever_times
            .iter()
            .map(|&time| MusicTimedPoint { time })
            .collect(),
    }
}

#[tokio::test]
async fn skill_windows_scale_the_notes_they_cover() {
    let calculator = LiveExactCalculator::new(common::provider());
    // One 150% skill at 0.5 covers the notes at 1 and 2 but not 0 or 10.
    let score = chart(&[0.0, 1.0, 2.0, 10.0], &[0.5], &[]);
    let detail = calculator
        .calculate(1000, &[150.0], LiveType::Solo, &score, None, None)
        .await
        .expect("exact detail");
    // Each note is worth power * 4 / 4 notes = 1000 before effects.
    let scores: Vec<f64> = detail.notes.iter().map(|it| it.score).collect();
    assert_eq!(scores, vec![1000.0, 1500.0, 1500.0, 1000.0]);
    assert_eq!(detail.total, 5000.0);
    assert_eq!(detail.active_bonus, 0.0);
    assert_eq!(detail.notes[1].effect_bonuses, vec![150.0]);
    assert!(detail.notes[0].effect_bonuses.is_empty());
}

#[tokio::test]
async fn fever_covers_a_tenth_of_the_chart_in_multi() {
    let calculator = LiveExactCalculator::new(common::provider());
    let note_times: Vec<f64> = (0..10).map(|i| i as f64).collect();
    // Ten notes: the fever window runs from its trigger at 5 over one note.
    let score = chart(&note_times, &[], &[5.0]);
    let detail = calculator
        .calculate(1000, &[], LiveType::Multi, &score, None, None)
        .await
        .expect("exact detail");
    // Base note value 1000 * 4 / 10 = 400; fever halves the covered note.
    assert_eq!(detail.notes[5].score, 200.0);
    assert_eq!(detail.notes[4].score, 400.0);
    assert_eq!(detail.notes[6].score, 400.0);
    let active = 5.0 * 0.015 * 5000.0;
    assert_eq!(detail.active_bonus, active);
    assert_eq!(detail.total, 9.0 * 400.0 + 200.0 + active);
}

#[tokio::test]
async fn short_charts_get_no_fever_window() {
    let calculator = LiveExactCalculator::new(common::provider());
    // Five notes: a tenth of the chart rounds down to zero fever notes.
    let score = chart(&[1.0, 2.0, 3.0, 4.0, 5.0], &[], &[2.0]);
    let detail = calculator
        .calculate(1000, &[], LiveType::Multi, &score, None, None)
        .await
        .expect("exact detail");
    assert!(detail.notes.iter().all(|it| it.effect_bonuses.is_empty()));
}

#[tokio::test]
async fn missing_skill_values_are_rejected() {
    let calculator = LiveExactCalculator::new(common::provider());
    let score = chart(&[0.0, 1.0], &[0.0, 1.0], &[]);
    assert!(calculator
        .calculate(1000, &[150.0], LiveType::Solo, &score, None, None)
        .await
        .is_err());
}

#[tokio::test]
async fn overlapping_effects_multiply() {
    let calculator = LiveExactCalculator::new(common::provider());
    // Two overlapping 200% skills quadruple the covered note.
    let score = chart(&[1.0, 20.0], &[0.0, 0.5], &[]);
    let detail = calculator
        .calculate(1000, &[200.0, 200.0], LiveType::Solo, &score, None, None)
        .await
        .expect("exact detail");
    // Base note value 1000 * 4 / 2 = 2000.
    assert_eq!(detail.notes[0].score, 8000.0);
    assert_eq!(detail.notes[1].score, 2000.0);
}
