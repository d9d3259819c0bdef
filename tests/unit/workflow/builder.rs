use super::*;

#[test]
fn builds_fixed_topology() {
    let graph = build_workflow("a goblin", "blurry", 42, 128, 128).unwrap();
    assert_eq!(graph.len(), 7);
    assert_eq!(graph.output(), &NodeId::new("9"));
    assert_eq!(graph.seed(), Some(42));

    let kinds: Vec<&str> = graph.nodes().map(|(_, n)| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            "KSampler",
            "CheckpointLoaderSimple",
            "EmptyLatentImage",
            "CLIPTextEncode",
            "CLIPTextEncode",
            "VAEDecode",
            "SaveImage",
        ]
    );
}

#[test]
fn varies_only_prompt_seed_and_resolution() {
    let a = build_workflow("a", "n", 1, 128, 128).unwrap();
    let b = build_workflow("b", "m", 2, 64, 96).unwrap();

    let Some(Node::EmptyLatentImage(latent)) = b.node(&NodeId::new("5")) else {
        panic!("latent node missing");
    };
    assert_eq!((latent.width, latent.height, latent.batch_size), (64, 96, 1));

    let Some(Node::ClipTextEncode(neg)) = b.node(&NodeId::new("7")) else {
        panic!("negative encoder missing");
    };
    assert_eq!(neg.text, "m");

    let (Some(Node::KSampler(sa)), Some(Node::KSampler(sb))) =
        (a.node(&NodeId::new("3")), b.node(&NodeId::new("3")))
    else {
        panic!("sampler missing");
    };
    assert_eq!(sa.steps, sb.steps);
    assert_eq!(sa.cfg, sb.cfg);
    assert_eq!(sa.denoise, 1.0);
    assert_eq!(sa.model, sb.model);
    assert_eq!(sa.latent_image, sb.latent_image);
    assert_ne!(sa.seed, sb.seed);
}

#[test]
fn api_json_wires_checkpoint_slots() {
    let json = build_workflow("p", "n", 7, 128, 128)
        .unwrap()
        .to_api_json()
        .unwrap();
    assert_eq!(json["3"]["inputs"]["model"], serde_json::json!(["4", 0]));
    assert_eq!(json["6"]["inputs"]["clip"], serde_json::json!(["4", 1]));
    assert_eq!(json["8"]["inputs"]["vae"], serde_json::json!(["4", 2]));
    assert_eq!(json["9"]["inputs"]["images"], serde_json::json!(["8", 0]));
    assert_eq!(json["3"]["inputs"]["seed"], serde_json::json!(7));
    assert_eq!(json["9"]["class_type"], "SaveImage");
}

#[test]
fn default_sampler_settings_reach_the_api_json() {
    let json = build_workflow("p", "n", 7, 128, 128)
        .unwrap()
        .to_api_json()
        .unwrap();
    assert_eq!(json["3"]["inputs"]["sampler_name"], "euler_ancestral");
    assert_eq!(json["3"]["inputs"]["scheduler"], "normal");
    assert_eq!(json["3"]["inputs"]["steps"], 15);
}

#[test]
fn deterministic_for_same_inputs() {
    let a = build_workflow("p", "n", 9, 128, 128).unwrap();
    let b = build_workflow("p", "n", 9, 128, 128).unwrap();
    assert_eq!(a, b);
}

#[test]
fn rejects_zero_resolution() {
    assert!(build_workflow("p", "n", 1, 0, 128).is_err());
    assert!(build_workflow("p", "n", 1, 128, 0).is_err());
}

#[test]
fn custom_settings_flow_into_graph() {
    let builder = WorkflowBuilder::new(SamplerSettings {
        steps: 30,
        checkpoint: "pixel.safetensors".to_string(),
        ..SamplerSettings::default()
    });
    let graph = builder.build("p", "n", 1, 64, 64).unwrap();
    let Some(Node::KSampler(s)) = graph.node(&NodeId::new("3")) else {
        panic!("sampler missing");
    };
    assert_eq!(s.steps, 30);
    let Some(Node::CheckpointLoader(c)) = graph.node(&NodeId::new("4")) else {
        panic!("checkpoint missing");
    };
    assert_eq!(c.ckpt_name, "pixel.safetensors");
}

#[test]
fn settings_validation() {
    assert!(SamplerSettings::default().validate().is_ok());
    assert!(
        SamplerSettings {
            steps: 0,
            ..SamplerSettings::default()
        }
        .validate()
        .is_err()
    );
    assert!(
        SamplerSettings {
            cfg: f64::NAN,
            ..SamplerSettings::default()
        }
        .validate()
        .is_err()
    );
}
