use crate::models::domain::SubjectCategory;

/// Machine-parseable block layout every prompt asks for. The response parser
/// reads exactly this shape; change both together.
pub const OUTPUT_CONTRACT: &str = "QUESTION <n>:
<question text>
A) <option>
B) <option>
C) <option>
D) <option>
CORRECT: <A|B|C|D>
EXPLANATION: <text>";

pub const EXAMPLE_START: &str = "EXAMPLE:";
pub const EXAMPLE_END: &str = "END OF EXAMPLE";

pub const FORMAT_RULES: &str = "- Start every question with \"QUESTION <n>:\" on its own line, numbering from 1.
- Give exactly four options labelled A) to D), one per line, all different.
- Write the letter of the single correct option after \"CORRECT:\".
- Write a one or two sentence justification after \"EXPLANATION:\".
- Do not add headings, markdown, commentary or anything outside the blocks.";

pub const OPEN_RESPONSE_NOTE: &str = "Items marked \"open response\" will be shown without options: phrase them so they can be answered in a sentence, and make the correct option the model answer. Still write all four options for every item.";

pub const PATTERN_INTRO: &str = "This question was well received for this subject before. Match its style, length and difficulty, but do not copy it or reuse its wording:";

/// Subject-specific pieces of a prompt.
pub struct SubjectTemplate {
    pub role: &'static str,
    pub guidance: &'static [&'static str],
    pub example: &'static str,
}

const MATHEMATICS: SubjectTemplate = SubjectTemplate {
    role: "You are a mathematics teacher writing assessment questions that test understanding and calculation.",
    guidance: &[
        "Verify every calculation step by step before writing it down; an answer key with an arithmetic slip is unacceptable.",
        "Write any equation in the explanation in the form \"a × b = c\" with the correct result.",
        "Make distractors plausible results of common mistakes, never random numbers.",
        "Use only quantities, formulas and notation that appear in the material.",
    ],
    example: "QUESTION 1:
A rectangle has a length of 8 cm and a width of 5 cm. What is its area?
A) 13 square cm
B) 40 square cm
C) 26 square cm
D) 45 square cm
CORRECT: B
EXPLANATION: Area is length times width, so 8 × 5 = 40 square cm.",
};

const NATURAL_SCIENCES: SubjectTemplate = SubjectTemplate {
    role: "You are a science teacher writing questions that test understanding of scientific concepts and processes.",
    guidance: &[
        "State only scientifically accepted facts; never present a common misconception as correct.",
        "Prefer questions about causes, mechanisms and predictions over isolated vocabulary.",
        "Keep units and quantities consistent with the material.",
    ],
    example: "QUESTION 1:
Why does ice float on liquid water?
A) Ice is less dense than liquid water
B) Ice contains no water molecules
C) Ice is pushed up by the heat of the water
D) Ice has a greater mass than the water it displaces
CORRECT: A
EXPLANATION: Water expands as it freezes, so ice has a lower density and floats.",
};

const LITERATURE: SubjectTemplate = SubjectTemplate {
    role: "You are a literature teacher writing questions that test interpretation and analysis of texts.",
    guidance: &[
        "Do not ask plot-summary questions such as what happens next or what a character did.",
        "Frame every question analytically: themes, symbols, motives, tone, narrative technique or the effect of language.",
        "Base every question on evidence in the material.",
    ],
    example: "QUESTION 1:
In the passage, what does the recurring image of the locked door most likely symbolize?
A) The narrator's fear of change
B) The family's wealth
C) The season in which the story is set
D) The author's dislike of architecture
CORRECT: A
EXPLANATION: The door stays shut whenever the narrator faces a decision, tying it to a fear of change.",
};

const HISTORY: SubjectTemplate = SubjectTemplate {
    role: "You are a history teacher writing questions that test understanding of historical causes and consequences.",
    guidance: &[
        "Avoid bare date-recall questions such as \"In what year...\".",
        "Ask about causation, significance, change over time and competing perspectives.",
        "Keep every claim consistent with the material.",
    ],
    example: "QUESTION 1:
Why did rising bread prices increase unrest among the urban poor of Paris?
A) Bread was the main part of their diet, so higher prices threatened survival
B) Bread was exported to pay for new palaces
C) Bakers were forbidden from working in the city
D) The poor preferred imported grain
CORRECT: A
EXPLANATION: Most of a worker's wages went on bread, so price rises turned hardship into protest.",
};

const COMPUTER_SCIENCE: SubjectTemplate = SubjectTemplate {
    role: "You are a computer science teacher writing questions that test understanding of programming and computing concepts.",
    guidance: &[
        "Do not use any syntax, language feature or library that does not appear in the material.",
        "Any code you quote must be complete and balanced: every bracket and quote must be closed.",
        "Prefer questions about behaviour and reasoning over memorised definitions.",
    ],
    example: "QUESTION 1:
How many times does the body of the loop `for (i = 0; i < 3; i++)` run?
A) Three times
B) Two times
C) Four times
D) It never runs
CORRECT: A
EXPLANATION: The counter takes the values 0, 1 and 2 before the condition fails.",
};

const LANGUAGES: SubjectTemplate = SubjectTemplate {
    role: "You are a language teacher writing questions that test vocabulary, grammar and reading comprehension.",
    guidance: &[
        "Never ask anything that requires audio, listening or pronunciation; learners only see text.",
        "Test usage in context rather than isolated word lists.",
        "Keep all target-language text accurate and natural.",
    ],
    example: "QUESTION 1:
Which sentence uses the past tense of the verb go correctly?
A) Yesterday I went to the market
B) Yesterday I goed to the market
C) Yesterday I go to the market
D) Yesterday I going to the market
CORRECT: A
EXPLANATION: Go is irregular and its simple past form is went.",
};

const BUSINESS: SubjectTemplate = SubjectTemplate {
    role: "You are a business studies teacher writing questions that test understanding of business concepts and decisions.",
    guidance: &[
        "Prefer applied scenarios over definitions.",
        "Keep figures and terminology consistent with the material.",
    ],
    example: "QUESTION 1:
What is the main purpose of a cash flow statement?
A) To show how cash moves into and out of a business over a period
B) To list every employee's salary
C) To record the company's share price history
D) To describe the company's marketing plan
CORRECT: A
EXPLANATION: The cash flow statement tracks operating, investing and financing cash movements.",
};

const ARTS: SubjectTemplate = SubjectTemplate {
    role: "You are an art teacher writing questions that test knowledge of techniques, movements and interpretation.",
    guidance: &[
        "Never ask learners to look at an image, painting or figure; none will be shown.",
        "Describe any artwork in words if a question depends on it.",
    ],
    example: "QUESTION 1:
Which technique uses strong contrasts between light and dark to create drama?
A) Chiaroscuro
B) Pointillism
C) Impasto
D) Collage
CORRECT: A
EXPLANATION: Chiaroscuro models forms through bold contrasts of light and shadow.",
};

const HEALTH_MEDICINE: SubjectTemplate = SubjectTemplate {
    role: "You are a health sciences teacher writing educational questions about health and the human body.",
    guidance: &[
        "Never give prescriptive medical advice, doses or treatment instructions addressed to the reader.",
        "Keep questions educational: physiology, concepts, public health and evidence.",
    ],
    example: "QUESTION 1:
Which nutrient is the body's main source of quick energy?
A) Carbohydrates
B) Vitamins
C) Minerals
D) Fibre
CORRECT: A
EXPLANATION: Carbohydrates are broken down into glucose, which cells use for fast energy.",
};

const GENERAL: SubjectTemplate = SubjectTemplate {
    role: "You are an experienced teacher writing clear assessment questions from study material.",
    guidance: &[
        "Test understanding of the key ideas rather than trivial details.",
        "Keep every question answerable from the material alone.",
    ],
    example: "QUESTION 1:
Which statement best describes the central idea of the material?
A) Regular practice improves long-term retention
B) Memorising lists is the only way to learn
C) Learning depends entirely on talent
D) Reviewing material has no measurable effect
CORRECT: A
EXPLANATION: The material argues that spaced, regular practice strengthens retention.",
};

pub fn subject_template(subject: SubjectCategory) -> &'static SubjectTemplate {
    match subject {
        SubjectCategory::Mathematics => &MATHEMATICS,
        SubjectCategory::NaturalSciences => &NATURAL_SCIENCES,
        SubjectCategory::Literature => &LITERATURE,
        SubjectCategory::History => &HISTORY,
        SubjectCategory::ComputerScience => &COMPUTER_SCIENCE,
        SubjectCategory::Languages => &LANGUAGES,
        SubjectCategory::Business => &BUSINESS,
        SubjectCategory::Arts => &ARTS,
        SubjectCategory::HealthMedicine => &HEALTH_MEDICINE,
        SubjectCategory::Other => &GENERAL,
    }
}
