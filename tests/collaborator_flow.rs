use std::collections::BTreeMap;

use classifier_panel::chips;
use classifier_panel::collaborator::{self, parse_token_request};
use classifier_panel::panel::{ConfigPanel, ModelTab};
use classifier_panel::store::ConfigStore;
use eframe::egui;

fn frame(panel: &mut ConfigPanel, ctx: &egui::Context) {
    let _ = ctx.run(egui::RawInput::default(), |ctx| panel.show(ctx));
}

#[test]
fn engine_results_reach_every_view() {
    let mut panel = ConfigPanel::new(ConfigStore::default()).expect("bind panel");
    chips::request_translation(panel.store_mut(), "12, 40").expect("store request");
    let request = panel
        .store()
        .read()
        .text_vectorization_config
        .translation_request
        .token
        .clone();

    let sender = panel.update_sender();
    let engine = std::thread::spawn(move || {
        let parsed = parse_token_request(&request);
        assert!(parsed.is_clean());
        let pairs: Vec<(u32, String)> = parsed
            .tokens
            .iter()
            .map(|token| (*token, format!("word{token}")))
            .collect();
        let mut metrics = BTreeMap::new();
        metrics.insert("loss".to_string(), vec![0.69, 0.52, 0.41]);
        metrics.insert("binary_accuracy".to_string(), vec![0.55, 0.74, 0.82]);
        metrics.insert("val_loss".to_string(), vec![0.66, 0.5, 0.45]);
        metrics.insert("val_binary_accuracy".to_string(), vec![0.6, 0.75, 0.8]);

        let texts = vec![
            "a wonderful film".to_string(),
            "dull and long".to_string(),
            "never again".to_string(),
        ];
        sender.edit(move |tree| collaborator::set_preview_sample(tree, &texts, &[1, 0, 0]));
        sender.edit(move |tree| collaborator::set_training_history(tree, &metrics));
        sender.edit(|tree| collaborator::set_evaluation(tree, 0.43, 0.81));
        sender.edit(move |tree| collaborator::set_token_translations(tree, &pairs));
    });
    engine.join().expect("engine thread");

    let ctx = egui::Context::default();
    frame(&mut panel, &ctx);

    let views = panel.views();
    assert_eq!(views.table().rows.len(), 2);
    assert_eq!(views.table().rows[1].text, "dull and long");
    let chart = views.chart().expect("chart");
    assert_eq!(chart.series.len(), 4);
    assert!(chart.series.iter().all(|series| series.x == vec![1, 2, 3]));
    let cards = views.cards().expect("cards");
    assert_eq!(cards[0].stat, "0.4300");
    assert_eq!(cards[1].stat, "0.8100");
    let labels: Vec<&str> = views.chips().iter().map(|chip| chip.label.as_str()).collect();
    assert_eq!(labels, vec!["12:word12", "40:word40"]);

    let key = views.chips()[0].key;
    assert!(chips::delete_chip(panel.store_mut(), key).expect("delete"));
    assert!(!chips::delete_chip(panel.store_mut(), key).expect("repeat delete"));
    panel.set_model_tab(ModelTab::Prediction);
    frame(&mut panel, &ctx);
    assert_eq!(panel.views().chips().len(), 1);
}

#[test]
fn rejected_engine_write_leaves_panel_state_alone() {
    let mut panel = ConfigPanel::new(ConfigStore::default()).expect("bind panel");
    let sender = panel.update_sender();
    sender.edit(|tree| {
        collaborator::set_token_translations(tree, &[(1, "a".to_string())]);
        let duplicate = tree.text_vectorization_config.token_chips[0].clone();
        tree.text_vectorization_config.token_chips.push(duplicate);
    });

    let ctx = egui::Context::default();
    frame(&mut panel, &ctx);
    assert_eq!(panel.store().revision(), 0);
    assert!(panel.views().chips().is_empty());
}
