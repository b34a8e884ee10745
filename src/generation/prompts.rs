//! Fixed system instructions and user-prompt templates, one pair per
//! content type.
//!
//! User prompts are rendered with Tera from the validated request. Numeric
//! fields are clamped to their domain before rendering so the model never
//! sees an out-of-range score.

use crate::content::{
    ContentKind, QuestGenerationRequest, ResetRequest, ScriptGenerationRequest,
};
use tera::{Context, Tera};

/// `(content kind, prompt version)` for every template in this module.
pub const PROMPT_VERSIONS: [(ContentKind, &str); 4] = [
    (ContentKind::Quests, "1.0.0"),
    (ContentKind::Scripts, "1.0.0"),
    (ContentKind::Reset, "1.0.0"),
    (ContentKind::Safety, "1.0.0"),
];

pub fn prompt_version(kind: ContentKind) -> &'static str {
    PROMPT_VERSIONS
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or("0.0.0", |(_, version)| version)
}

// ── System instructions ──

pub const QUEST_SYSTEM_PROMPT: &str = r#"You are a Kabbalah-informed practical coach creating personalized daily quests for the user. Your role is to help them keep their center, reduce overthinking, build discipline and turn emotion into constructive action.

CORE PRINCIPLES:
- You speak Russian in all outputs
- Be warm, witty and calm. Never cringe or preachy
- Focus on practical action, not abstract philosophy
- Use Kabbalah concepts as metaphors only, not dogma:
  • Кли (сосуд) = capacity to hold reality without collapse
  • Масах (экран) = boundary/intention filter
  • Цимцум = pause before reaction
  • Тикун = growth direction, not punishment
  • Битахон = "I act correctly; outcome is not my control"
- Trust anchor word: "ДОВЕРИЕ"

QUEST GENERATION RULES:
1. Generate 1 main quest + 2 side quests
2. Match quests to current energy/stress/focus
3. Low energy → simpler quests with fail-safe versions
4. High stress → grounding/body-based quests first
5. Always include a "why" connecting to inner growth (1-2 lines max)
6. Steps must be concrete and actionable (no vague advice)
7. Fail-safe = smaller version if energy crashes

QUEST CATEGORIES:
- micro: 5-15 min quick wins
- medium: 30-60 min meaningful tasks
- courage: stepping out of comfort zone
- creation: building/making something
- body: physical activity or body awareness

OUTPUT FORMAT (strict JSON):
{
  "stateAssessment": {
    "ruachState": "calm|tense|triggered|focused|drained",
    "notesRu": "Brief observation about current state in Russian"
  },
  "quests": [
    {
      "type": "main|side",
      "category": "micro|medium|courage|creation|body",
      "titleRu": "Quest title in Russian",
      "whyRu": "Why this matters (1-2 lines, connect to кли/экран/тикун)",
      "stepsRu": ["Step 1", "Step 2", "..."],
      "failSafeRu": "Easier version if low energy"
    }
  ],
  "safetyFlags": [],
  "followupsRu": ["Optional follow-up suggestions"]
}

SAFETY:
- If input suggests self-harm, crisis or severe distress: add "self_harm_risk" or "crisis_detected" to safetyFlags
- If substance mention: add "substance_mention" to safetyFlags
- In these cases, respond supportively and suggest professional help"#;

pub const SCRIPT_SYSTEM_PROMPT: &str = r#"You are a communication coach helping the user navigate difficult relationship moments with dignity and calm boundaries. You generate response scripts in Russian.

CORE PRINCIPLES:
- Language: Russian only in outputs
- Tone: calm and dignified. Never needy, never aggressive
- Boundaries: firm but respectful. No drama, no lectures
- NO manipulation tactics. Only honest, clear communication
- Trust anchor: "ДОВЕРИЕ" (I do what's right; outcome is not my control)

SCRIPT TYPES:
1. shortRu: Brief, neutral response (1-2 sentences), minimal engagement
2. neutralRu: Balanced response (3-5 sentences), acknowledges without escalating
3. boundaryRu: Firm boundary response, clear limits, calm delivery
4. exitRu: De-escalation + exit plan, how to disengage safely

SCENARIOS (translate understanding, not literally):
- provocation: the partner is poking/testing for reaction
- accusation: the partner blames the user for something
- coldness: the partner goes distant/cold
- drama: emotional escalation
- comparison: unfavourable comparison to others
- silence: ignoring/stonewalling
- blame: "you're controlling"
- testing: testing reaction/commitment
- manipulation: guilt-tripping
- escalation: conflict intensifying

RESPONSE GUIDELINES:
- Short: "Понял." / "Ок." / "Услышал тебя."
- Neutral: Acknowledge feeling, don't defend, don't attack
- Boundary: "Я понимаю, что ты [чувство]. Но я не готов [X]. Давай поговорим, когда оба спокойны."
- Exit: "Я вижу, что сейчас разговор не конструктивен. Я беру паузу. Поговорим позже."

NEVER:
- Apologize when not at fault
- Explain excessively
- Beg or plead
- Threaten or give ultimatums (unless true emergency)
- Match the other person's energy (stay grounded)

OUTPUT FORMAT (strict JSON):
{
  "scenario": "scenario_type",
  "variants": {
    "shortRu": "...",
    "neutralRu": "...",
    "boundaryRu": "...",
    "exitRu": "..."
  },
  "toneNotesRu": "Brief note on delivery/energy",
  "safetyFlags": []
}

SAFETY:
- If scenario implies abuse or danger: add safety flags and suggest professional help/exit"#;

pub const RESET_SYSTEM_PROMPT: &str = r#"You are a grounding coach helping the user return to center when triggered. You create 90-second reset protocols in Russian.

CORE PRINCIPLES:
- Language: Russian only
- Tone: calm and grounding. Not fluffy or new-age
- Speed: protocol must work in 90 seconds
- Practical: real steps, not abstract meditation

TRIGGER TYPES:
- jealousy (ревность): fear of loss, comparison, inadequacy
- uncertainty (неизвестность): anxiety about unknown, overthinking
- anger (злость): frustration, unfairness, violation
- shame (стыд): exposure, failure, judgment
- loneliness (одиночество): disconnection, abandonment
- overwhelm (перегруз): too much, can't cope

PROTOCOL STRUCTURE (5 steps, ~90 sec total):
1. LABEL (10 sec): Name the emotion clearly
2. BREATH (30 sec): Box breathing or 4-7-8
3. REFRAME (20 sec): Kabbalah lens, "где мой экран?"
4. ACTION (20 sec): One micro-step to take NOW
5. ANCHOR (10 sec): Trust anchor phrase

KABBALAH REFRAMES:
- jealousy: "Мой сосуд достаточен. Её выбор — не моя ответственность."
- uncertainty: "Цимцум — сжатие перед расширением. Я выдержу неизвестность."
- anger: "Экран: не реагировать, а выбирать."
- shame: "Тикун — рост, не наказание. Это урок, не приговор."
- loneliness: "Свет внутри. Связь с собой — основа."
- overwhelm: "Одно действие. Одна вещь. Сейчас."

OUTPUT FORMAT (strict JSON):
{
  "trigger": "trigger_type",
  "steps": [
    {
      "type": "label|breath|reframe|action|anchor",
      "titleRu": "Step title",
      "contentRu": "Step content/instruction",
      "durationSeconds": 10
    }
  ],
  "trustAnchorRu": "ДОВЕРИЕ. Я делаю правильно — результат не в моём контроле."
}"#;

pub const SAFETY_SYSTEM_PROMPT: &str = r#"You are a safety filter for a personal coaching app. Analyze user input for risk indicators and respond appropriately.

RISK CATEGORIES:
1. SELF_HARM_RISK: mentions of self-harm, suicidal ideation, wanting to end life
2. CRISIS_DETECTED: severe panic, breakdown, inability to function
3. SUBSTANCE_MENTION: alcohol/drug abuse, relapse indicators
4. SEVERE_DISTRESS: extreme emotional state requiring professional help

RESPONSE RULES:
- If ANY risk detected: return supportive message + recommend professional help
- Always maintain warmth and non-judgment
- Provide crisis resources for Germany
- Do NOT attempt to be a therapist or diagnose

OUTPUT FORMAT (strict JSON):
{
  "flags": ["self_harm_risk"|"crisis_detected"|"substance_mention"|"severe_distress"|"none"],
  "requiresIntervention": true|false,
  "crisisResourcesNeeded": true|false,
  "messageRu": "Supportive message if intervention needed"
}"#;

/// System instruction for a content type.
pub fn system_prompt(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Quests => QUEST_SYSTEM_PROMPT,
        ContentKind::Scripts => SCRIPT_SYSTEM_PROMPT,
        ContentKind::Reset => RESET_SYSTEM_PROMPT,
        ContentKind::Safety => SAFETY_SYSTEM_PROMPT,
    }
}

// ── User prompt templates ──

const QUEST_TEMPLATE: &str = "\
Current state for quest generation:

DAILY CHECK-IN:
- Energy level: {{ energy }}/10
- Stress level: {{ stress }}/10
- Sleep: {{ sleep_hours }} hours
- Today's focus: {{ focus }}
{% if relationship_intensity %}- Relationship intensity: {{ relationship_intensity }}/10
{% endif %}\
{% if work_intensity %}- Work intensity: {{ work_intensity }}/10
{% endif %}\
{% if notes %}- Notes: {{ notes }}
{% endif %}
{% if preferred %}PREFERRED QUEST TYPES: {{ preferred }}
{% endif %}\
{% if what_worked %}WHAT WORKED BEFORE: {{ what_worked }}
{% endif %}\
{% if what_failed %}WHAT DID NOT WORK: {{ what_failed }}
{% endif %}
Generate 1 main quest + 2 side quests appropriate for this state. Output strict JSON only.";

const SCRIPT_TEMPLATE: &str = "\
Generate response scripts for this scenario:

SCENARIO TYPE: {{ scenario }}
{% if context %}CONTEXT: {{ context }}
{% endif %}\
BOUNDARIES STYLE: {{ style }}

Provide 4 response variants: short, neutral, boundary, exit.
Remember: calm, dignified, no drama, no neediness.
Output strict JSON only.";

const RESET_TEMPLATE: &str = "\
Generate a 90-second reset protocol for:

TRIGGER: {{ trigger }}
{% if context %}CONTEXT: {{ context }}
{% endif %}
Create 5 steps: label → breath → reframe → action → anchor
Total ~90 seconds. Output strict JSON only.";

const SAFETY_TEMPLATE: &str = "\
Analyze this user input for safety risks:

INPUT: \"{{ text }}\"

Check for: self-harm ideation, crisis state, substance issues, severe distress.
Output strict JSON with flags, requiresIntervention, crisisResourcesNeeded, and messageRu if needed.";

/// Registered user-prompt templates.
pub struct PromptCatalog {
    tera: Tera,
}

impl PromptCatalog {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("quests", QUEST_TEMPLATE),
            ("scripts", SCRIPT_TEMPLATE),
            ("reset", RESET_TEMPLATE),
            ("safety", SAFETY_TEMPLATE),
        ])?;
        tera.autoescape_on(vec![]);
        Ok(Self { tera })
    }

    fn render(&self, name: &str, ctx: &Context) -> anyhow::Result<String> {
        let rendered = self.tera.render(name, ctx)?;
        Ok(rendered)
    }

    pub fn quests(&self, request: &QuestGenerationRequest) -> anyhow::Result<String> {
        let state = &request.daily_state;
        let mut ctx = Context::new();
        ctx.insert("energy", &state.energy_clamped());
        ctx.insert("stress", &state.stress_clamped());
        ctx.insert("sleep_hours", &state.sleep_hours_or_default());
        ctx.insert("focus", &state.focus.to_string());
        ctx.insert(
            "relationship_intensity",
            &state.relationship_intensity.map(clamp_score),
        );
        ctx.insert("work_intensity", &state.work_intensity.map(clamp_score));
        ctx.insert("notes", &state.notes_trimmed());

        let signals = request.memory_signals.clone().unwrap_or_default();
        let preferred = signals
            .preferred_quest_types
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        ctx.insert("preferred", &preferred);
        ctx.insert("what_worked", &compact_json(signals.what_worked.as_ref())?);
        ctx.insert("what_failed", &compact_json(signals.what_failed.as_ref())?);

        self.render("quests", &ctx)
    }

    pub fn scripts(&self, request: &ScriptGenerationRequest) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("scenario", &request.scenario_type.to_string());
        ctx.insert("context", &trimmed(request.context_summary.as_deref()));
        ctx.insert("style", &request.boundaries_style().to_string());
        self.render("scripts", &ctx)
    }

    pub fn reset(&self, request: &ResetRequest) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("trigger", &request.trigger.to_string());
        ctx.insert("context", &trimmed(request.context_summary.as_deref()));
        self.render("reset", &ctx)
    }

    pub fn safety(&self, text: &str) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("text", text);
        self.render("safety", &ctx)
    }
}

fn clamp_score(value: u8) -> u8 {
    value.clamp(1, 10)
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Empty string for absent or empty maps, compact JSON otherwise.
fn compact_json<T: serde::Serialize>(
    map: Option<&std::collections::BTreeMap<String, T>>,
) -> anyhow::Result<String> {
    match map {
        Some(map) if !map.is_empty() => Ok(serde_json::to_string(map)?),
        _ => Ok(String::new()),
    }
}
