//! 本地兜底问答表
//!
//! 远程服务不可用（或离线模式）时唯一的回答来源

use phf::phf_map;

/// 第一层：问题完全匹配（区分大小写，只去除首尾空白）
pub static EXACT_ANSWERS: phf::Map<&'static str, &'static str> = phf_map! {
    "What is the main topic of this document?" =>
        "The main topic of this document is an in-depth analysis of the subject matter discussed.",
    "Can you summarize the key points?" =>
        "The key points include a comprehensive overview, supporting data, and the final conclusions drawn by the authors.",
    "What are the conclusions?" =>
        "The document concludes that the findings support the initial hypothesis and suggest further research is needed.",
    "Who are the main authors mentioned?" =>
        "The main authors mentioned are Dr. Smith, Prof. Johnson, and Dr. Lee.",
    "What data or statistics are presented?" =>
        "The document presents several statistics, including a 25% increase over the last year and survey results from 500 participants.",
};

/// 第二层：未命中时随机选取的通用回答
pub const GENERIC_ANSWERS: [&str; 5] = [
    "This document provides valuable insights and detailed analysis on the topic.",
    "The authors have presented their arguments with supporting evidence throughout the document.",
    "Key findings are highlighted in the summary section towards the end.",
    "Several data points and case studies are discussed to support the conclusions.",
    "The document emphasizes the importance of continued research in this area.",
];

/// 推荐给用户的问题，按展示顺序排列
pub const SUGGESTED_QUESTIONS: [&str; 5] = [
    "What is the main topic of this document?",
    "Can you summarize the key points?",
    "What are the conclusions?",
    "Who are the main authors mentioned?",
    "What data or statistics are presented?",
];

/// 查找完全匹配的回答
pub fn exact_answer(question: &str) -> Option<&'static str> {
    EXACT_ANSWERS.get(question).copied()
}
