//! Prompt templates for the tutoring endpoints. Every prompt asks the model for
//! a single JSON object so the response can be passed through unchanged.

use crate::models::tutor::GenerateRequest;

pub const SOLVE_SYSTEM_PROMPT: &str = r#"你是一名耐心的高中数学老师。请一步一步地解答学生的问题，每一步都要说明依据。
只输出一个 JSON 对象，格式如下：
{
  "success": true,
  "question": "题目原文",
  "answer": "最终答案",
  "steps": [
    {"step": 1, "title": "步骤标题", "content": "推导过程", "formula": "LaTeX 公式（可选）"}
  ],
  "knowledge_points": ["涉及的知识点"],
  "statistics": {"total_steps": 1, "time_used": "估计用时"}
}
如果无法解答，输出 {"success": false, "error": "原因"}。"#;

pub const GENERATE_SYSTEM_PROMPT: &str = r#"你是一名高中数学命题专家，擅长根据要求编写原创练习题。
只输出一个 JSON 对象，格式如下：
{
  "success": true,
  "question": "题目内容",
  "difficulty": "简单|中等|困难",
  "tags": ["知识点"],
  "answer": "参考答案",
  "solution": "详细解析",
  "hint": "解题提示"
}
如果无法生成，输出 {"success": false, "error": "原因"}。"#;

pub const PLOT_GENERATE_SYSTEM_PROMPT: &str = r#"你是一名 Python 数据可视化助手。根据描述编写使用 matplotlib 和 numpy 的绘图代码。
代码要求：不读取或写入文件，不访问网络，图像通过 plt.show() 输出，中文标签使用 SimHei 字体。
只输出一个 JSON 对象，格式如下：
{
  "success": true,
  "code": "完整的 Python 代码",
  "explanation": "代码说明"
}
如果无法生成，输出 {"success": false, "error": "原因"}。"#;

pub fn solve_user_prompt(question: &str) -> String {
    format!("请解答下面的数学题：\n{}", question.trim())
}

pub fn generate_user_prompt(request: &GenerateRequest) -> String {
    let keywords = if request.topic_keywords.is_empty() {
        "无".to_string()
    } else {
        request.topic_keywords.join(", ")
    };
    let requirements = if request.requirements.trim().is_empty() {
        "无"
    } else {
        request.requirements.trim()
    };

    format!(
        "请生成一道数学题。\n难度：{}\n题型：{}\n关键词：{}\n其他要求：{}",
        request.difficulty_level.trim(),
        request.problem_type.trim(),
        keywords,
        requirements
    )
}

pub fn plot_user_prompt(description: &str) -> String {
    format!("请根据以下描述生成绘图代码：\n{}", description.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_prompt_lists_keywords() {
        let request = GenerateRequest {
            difficulty_level: "困难".to_string(),
            problem_type: "数列".to_string(),
            topic_keywords: vec!["等差".to_string(), "求和".to_string()],
            requirements: String::new(),
        };
        let prompt = generate_user_prompt(&request);
        assert!(prompt.contains("难度：困难"));
        assert!(prompt.contains("关键词：等差, 求和"));
        assert!(prompt.contains("其他要求：无"));
    }

    #[test]
    fn solve_prompt_embeds_question() {
        assert!(solve_user_prompt("  1+1=?  ").ends_with("1+1=?"));
    }
}
