use lyrics_clean::{normalize, CleanerConfig, ContainerSelector, Normalizer};

const MOJIM_PAGE: &str = r#"<html><body>
<div id="fsZ" class="fsZ"><dl class="fsZx1"><dt class="fsZx2">某歌手</dt><dd class="fsZx3">作詞：某人<br />作曲：某人<br />編曲：某人<br /><br />　第一句歌詞<br />第二句歌詞 **<br /><br /><br />＃副歌＃<br />第三句歌詞<br />更多更詳盡歌詞 在 <a href="http://mojim.com">※ Mojim.com　魔鏡歌詞網 </a><br /><br />[00:12.34]第一句歌詞<br />-----------<br /><ol><li>x</li></ol></dd></dl></div>
</body></html>"#;

fn fixtures() -> Vec<&'static str> {
    vec![
        MOJIM_PAGE,
        r#"<dd class="fsZx3">作词：张三<br/>第一句歌词<br/>----<br/>第二句歌词</dd>"#,
        r#"<dd class="fsZx3">  a  <br><br><br><br>b#<br>＊c＊</dd>"#,
        r#"<dd class="other fsZx3"><p>para</p>one<br/>two</dd>"#,
        r#"<dd class="fsZx3"></dd>"#,
        r#"<dd class="fsZx3"><b>unclosed<i>tags<br/>line"#,
        r#"<dd class="fsZx3">更多歌詞<br/><a href="/">魔鏡歌詞網</a><br/>第一句</dd>"#,
    ]
}

#[test]
fn missing_container_is_absent() {
    assert_eq!(None, normalize("<div>no lyrics here</div>"));
    assert_eq!(None, normalize(""));
    assert_eq!(None, normalize("<<<>>> &&& </dd>"));
    assert_eq!(None, normalize(r#"<dd class="fsZx2">x</dd>"#));
    assert_eq!(None, normalize(r#"<div class="fsZx3">x</div>"#));
}

#[test]
fn credit_and_separator_lines() {
    let raw = r#"<dd class="fsZx3">作词：张三<br/>第一句歌词<br/>----<br/>第二句歌词</dd>"#;
    assert_eq!(Some("第一句歌词\n第二句歌词".to_string()), normalize(raw));
}

#[test]
fn mojim_page() {
    assert_eq!(
        Some("第一句歌詞\n第二句歌詞\n副歌\n第三句歌詞".to_string()),
        normalize(MOJIM_PAGE)
    );
}

#[test]
fn boilerplate_pair_is_removed() {
    let raw = r#"<dd class="fsZx3">第一句<br/>更多更詳盡歌詞 在 <a href="/">魔鏡歌詞網</a><br/>第二句</dd>"#;
    let cleaned = normalize(raw).unwrap();
    assert_eq!("第一句\n第二句", cleaned);
    assert!(!cleaned.contains('更'));
    assert!(!cleaned.contains("魔鏡"));
}

#[test]
fn boilerplate_pair_across_line_breaks() {
    let raw = r#"<dd class="fsZx3">更多歌詞<br/><a href="/">魔鏡歌詞網</a><br/>第一句</dd>"#;
    assert_eq!(Some(String::from("第一句")), normalize(raw));
}

#[test]
fn empty_container_is_empty_text() {
    assert_eq!(Some(String::new()), normalize(r#"<dd class="fsZx3"></dd>"#));
}

#[test]
fn output_has_no_removed_tokens() {
    for raw in fixtures() {
        let cleaned = normalize(raw).unwrap();
        for token in ["<br/>", "#", "*", "＃", "＊"] {
            assert!(!cleaned.contains(token), "{token:?} in {cleaned:?}");
        }
    }
}

#[test]
fn output_has_no_long_newline_runs() {
    for raw in fixtures() {
        let cleaned = normalize(raw).unwrap();
        assert!(!cleaned.contains("\n\n\n"), "{cleaned:?}");
    }
}

#[test]
fn output_is_trimmed() {
    for raw in fixtures() {
        let cleaned = normalize(raw).unwrap();
        assert_eq!(cleaned.trim(), cleaned);
        for line in cleaned.lines() {
            assert_eq!(line.trim(), line, "{cleaned:?}");
        }
    }
}

#[test]
fn cleaning_is_idempotent() {
    let normalizer = Normalizer::new(&CleanerConfig::default()).unwrap();
    for raw in fixtures() {
        let once = normalizer.normalize(raw).unwrap();
        assert_eq!(once, normalizer.clean_text(&once));
    }
}

#[test]
fn container_is_configurable() {
    let conf = CleanerConfig {
        container: ContainerSelector::new("DIV", "lyrics"),
        ..Default::default()
    };
    let normalizer = Normalizer::new(&conf).unwrap();
    let raw = r#"<div class="lyrics">one<br>two</div><dd class="fsZx3">other</dd>"#;

    assert_eq!(Some("one\ntwo".to_string()), normalizer.normalize(raw));
    assert_eq!(None, normalizer.normalize(r#"<dd class="fsZx3">x</dd>"#));
}

#[test]
fn line_rules_are_overridable() {
    let conf = CleanerConfig {
        drop_lines: vec![String::from(r"^-*$")],
        ..Default::default()
    };
    let normalizer = Normalizer::new(&conf).unwrap();
    let raw = r#"<dd class="fsZx3">Chorus: la la<br/>----<br/>na na</dd>"#;

    assert_eq!(
        Some("Chorus: la la\nna na".to_string()),
        normalizer.normalize(raw)
    );
}

#[test]
fn first_container_wins() {
    let raw = r#"<dd class="fsZx3">first</dd><dd class="fsZx3">second</dd>"#;
    assert_eq!(Some("first".to_string()), normalize(raw));
}
