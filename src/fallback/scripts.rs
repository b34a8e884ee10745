use crate::content::{BoundariesStyle, ScenarioType, ScriptVariantSet, ScriptVariants};

struct Authored {
    short: &'static str,
    neutral: &'static str,
    boundary_firm: &'static str,
    boundary_gentle: &'static str,
    exit: &'static str,
    tone: &'static str,
}

const EXIT_DEFAULT: &str =
    "Я вижу, что сейчас разговор не конструктивен. Я беру паузу. Поговорим позже.";

fn authored(scenario: ScenarioType) -> Authored {
    match scenario {
        ScenarioType::Provocation => Authored {
            short: "Понял.",
            neutral: "Слышу тебя. Я не буду спорить ради спора. Если есть что-то важное — скажи прямо, я выслушаю.",
            boundary_firm: "Я вижу, что ты проверяешь мою реакцию. Я в это не играю. Давай поговорим, когда будет о чём говорить по-настоящему.",
            boundary_gentle: "Мне кажется, сейчас разговор уходит в подколы. Мне это не подходит. Если тебя что-то задело, скажи как есть.",
            exit: EXIT_DEFAULT,
            tone: "Спокойно, чуть медленнее обычного. Без улыбки превосходства и без оправданий.",
        },
        ScenarioType::Accusation => Authored {
            short: "Услышал тебя.",
            neutral: "Я понимаю, что ты злишься. Я смотрю на это иначе. Давай разберём факты, а не обвинения.",
            boundary_firm: "Я понимаю, что ты расстроена. Но я не готов принимать обвинения в таком тоне. Давай поговорим, когда оба спокойны.",
            boundary_gentle: "Я вижу, что тебе больно. Мне важно разобраться, но в обвинениях я не могу слушать. Расскажи, что случилось.",
            exit: "Сейчас мы не слышим друг друга. Я возьму паузу на час, потом вернусь к разговору.",
            tone: "Ровный голос. Не защищайся и не нападай. Факты, не эмоции.",
        },
        ScenarioType::Coldness => Authored {
            short: "Ок. Я рядом, если захочешь поговорить.",
            neutral: "Я замечаю, что ты отдалилась. Не буду давить. Когда будешь готова — я открыт к разговору.",
            boundary_firm: "Я вижу дистанцию. Гадать я не буду. Если что-то не так — скажи прямо, иначе я живу свою жизнь дальше.",
            boundary_gentle: "Мне не хватает нашего контакта. Я не требую объяснений, но мне важно знать, если что-то не так.",
            exit: "Я дам тебе пространство. Займусь своими делами. Напиши, когда захочешь.",
            tone: "Тепло, без упрёка. Не преследуй и не обижайся вслух.",
        },
        ScenarioType::Drama => Authored {
            short: "Вижу, что тебе тяжело.",
            neutral: "Я понимаю, что эмоций много. Я не буду подливать масла. Давай сначала выдохнем, потом обсудим.",
            boundary_firm: "Я не готов разговаривать на повышенных тонах. Когда ты будешь готова говорить спокойно — я здесь.",
            boundary_gentle: "Я слышу, как тебе сейчас сильно. Мне сложно разговаривать в таком накале. Давай сделаем паузу и вернёмся.",
            exit: EXIT_DEFAULT,
            tone: "Тише и медленнее, чем собеседник. Не повторяй её энергию.",
        },
        ScenarioType::Comparison => Authored {
            short: "Понял. Я — это я.",
            neutral: "Я слышу, что тебе чего-то не хватает. Сравнения не помогут. Скажи, что тебе важно, и я подумаю.",
            boundary_firm: "Сравнивать меня с другими — не разговор. Если тебе что-то нужно от меня, скажи прямо.",
            boundary_gentle: "Мне неприятно, когда меня сравнивают. Мне правда интересно, что ты хочешь. Давай об этом.",
            exit: "Этот разговор сейчас не приведёт к хорошему. Я отойду и подумаю. Вернёмся позже.",
            tone: "Без обиды в голосе. Твоя ценность не обсуждается.",
        },
        ScenarioType::Silence => Authored {
            short: "Я здесь, когда будешь готова.",
            neutral: "Вижу, что ты молчишь. Я не буду заваливать сообщениями. Когда захочешь говорить — я отвечу.",
            boundary_firm: "Молчание — тоже ответ. Я не буду бегать за разговором. Захочешь поговорить — напиши.",
            boundary_gentle: "Мне сложно, когда между нами тишина. Я подожду. Дай знать, когда сможешь поговорить.",
            exit: "Я занимаюсь своими делами. Дверь открыта, когда будешь готова.",
            tone: "Одно сообщение, не больше. Никаких двойных сообщений вдогонку.",
        },
        ScenarioType::Blame => Authored {
            short: "Слышу. Я не согласен.",
            neutral: "Я понимаю, что тебе кажется, будто я контролирую. Это не моя цель. Давай обсудим, что конкретно тебя задевает.",
            boundary_firm: "Я не принимаю ярлык «контролирующий». У меня есть свои границы, и я их обозначаю. Это не контроль.",
            boundary_gentle: "Мне важно, чтобы ты чувствовала свободу. И у меня тоже есть границы. Давай найдём, где они пересекаются.",
            exit: "Мы сейчас ходим по кругу. Я возьму паузу, чтобы не наговорить лишнего.",
            tone: "Без оправданий. Одно спокойное «нет» сильнее длинного объяснения.",
        },
        ScenarioType::Testing => Authored {
            short: "Понял.",
            neutral: "Мне кажется, ты проверяешь, как я отреагирую. Я спокоен. Если есть вопрос — задай его прямо.",
            boundary_firm: "Я не прохожу тесты. Я показываю себя делами. Хочешь что-то знать — спроси.",
            boundary_gentle: "Похоже, тебе нужна уверенность. Спроси меня прямо, я отвечу честно.",
            exit: "Я не буду в этом участвовать. Поговорим, когда будет спокойнее.",
            tone: "Лёгкость, без напряжения. Тест теряет силу, когда ты не играешь.",
        },
        ScenarioType::Manipulation => Authored {
            short: "Я услышал. Моё решение не меняется.",
            neutral: "Я вижу, что тебе не нравится моё решение. Я понимаю твои чувства, но за них я не отвечаю. Решение остаётся.",
            boundary_firm: "Чувство вины — не аргумент. Я принимаю решения сам. Если хочешь обсудить по существу — давай.",
            boundary_gentle: "Мне важно, что ты чувствуешь. Но я не буду менять решение из-за вины. Давай поговорим о том, что тебе нужно.",
            exit: "Я вижу, что мы не договоримся сейчас. Я беру паузу. Моя позиция не изменится от давления.",
            tone: "Твёрдо и тепло одновременно. Не извиняйся за своё решение.",
        },
        ScenarioType::Escalation => Authored {
            short: "Стоп. Давай остановимся.",
            neutral: "Разговор накаляется. Я не хочу, чтобы мы наговорили того, о чём пожалеем. Давай сделаем перерыв.",
            boundary_firm: "Я останавливаю этот разговор. Продолжим, когда оба остынем. Это не обсуждается.",
            boundary_gentle: "Мне важны мы, поэтому я предлагаю остановиться сейчас. Вернёмся к этому, когда станет тише.",
            exit: "Я выхожу из разговора на время. Это не наказание — это забота о нас обоих. Если станет небезопасно — я уйду и позову помощь.",
            tone: "Минимум слов. Низкий голос. Физически отойди, если нужно.",
        },
    }
}

pub(super) fn scripts_for(scenario: ScenarioType, style: BoundariesStyle) -> ScriptVariantSet {
    let text = authored(scenario);
    let boundary = match style {
        BoundariesStyle::Firm => text.boundary_firm,
        BoundariesStyle::Gentle => text.boundary_gentle,
    };

    ScriptVariantSet {
        scenario,
        variants: ScriptVariants {
            short_ru: text.short.to_string(),
            neutral_ru: text.neutral.to_string(),
            boundary_ru: boundary.to_string(),
            exit_ru: text.exit.to_string(),
        },
        tone_notes_ru: text.tone.to_string(),
        safety_flags: Vec::new(),
    }
}
